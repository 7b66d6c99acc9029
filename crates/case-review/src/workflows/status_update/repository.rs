use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationSummary, CommentRecord, ReferenceNumber, StatusUpdateRequest,
};

/// Stored application with the official comments left by reviewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    pub revision_instructions: Option<String>,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
}

impl ApplicationRecord {
    pub fn new(summary: ApplicationSummary) -> Self {
        Self {
            summary,
            revision_instructions: None,
            comments: Vec::new(),
        }
    }

    pub fn reference_number(&self) -> &ReferenceNumber {
        &self.summary.reference_number
    }

    /// Apply a status change. Instructions are replaced, so leaving
    /// `Needs Revision` clears them.
    pub fn apply(&mut self, request: StatusUpdateRequest) {
        self.summary.status = request.status;
        self.revision_instructions = request.revision_instructions;
        self.comments.push(request.comment);
    }
}

/// Storage abstraction so the form and router can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn fetch(&self, reference: &ReferenceNumber)
        -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<ApplicationSummary>, RepositoryError>;
    /// Apply `request` to the stored record and persist it as one atomic step,
    /// returning the updated record. Concurrent changes to one reference must
    /// each keep their comment.
    fn apply_status_change(
        &self,
        reference: &ReferenceNumber,
        request: StatusUpdateRequest,
    ) -> Result<ApplicationRecord, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("application {0} not found")]
    NotFound(ReferenceNumber),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
