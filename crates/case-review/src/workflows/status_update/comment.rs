use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{Actor, CommentId, CommentRecord};

/// Format used for the human-readable comment timestamp, e.g. `Oct 14, 2026, 3:05 PM UTC`.
pub const COMMENT_TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %-I:%M %p UTC";

/// Source of comment identifiers.
pub trait CommentIdGenerator: Send + Sync {
    fn next_id(&self) -> CommentId;
}

/// Random v4 identifiers, safe under rapid submissions and clock adjustments.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidCommentIds;

impl CommentIdGenerator for UuidCommentIds {
    fn next_id(&self) -> CommentId {
        CommentId(format!("cmt-{}", Uuid::new_v4().simple()))
    }
}

/// Monotonic per-generator counter, used where ids must be predictable.
#[derive(Debug)]
pub struct SequentialCommentIds {
    next: AtomicU64,
}

impl SequentialCommentIds {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialCommentIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl CommentIdGenerator for SequentialCommentIds {
    fn next_id(&self) -> CommentId {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        CommentId(format!("cmt-{id:06}"))
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Stamps official comments with the acting reviewer, an id and a timestamp.
#[derive(Clone)]
pub struct CommentAuthor {
    actor: Actor,
    ids: Arc<dyn CommentIdGenerator>,
    clock: Arc<dyn Clock>,
}

impl CommentAuthor {
    pub fn new(actor: Actor) -> Self {
        Self::with_sources(actor, Arc::new(UuidCommentIds), Arc::new(SystemClock))
    }

    pub fn with_sources(
        actor: Actor,
        ids: Arc<dyn CommentIdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { actor, ids, clock }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Same id and clock sources, different reviewer.
    pub fn acting_as(&self, actor: Actor) -> Self {
        Self {
            actor,
            ids: Arc::clone(&self.ids),
            clock: Arc::clone(&self.clock),
        }
    }

    pub fn official_comment(&self, message: impl Into<String>) -> CommentRecord {
        CommentRecord {
            id: self.ids.next_id(),
            user: self.actor.name.clone(),
            role: self.actor.role.clone(),
            message: message.into(),
            timestamp: self.clock.now().format(COMMENT_TIMESTAMP_FORMAT).to_string(),
            is_official: true,
        }
    }
}

impl std::fmt::Debug for CommentAuthor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentAuthor")
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}
