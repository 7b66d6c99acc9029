use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::workflows::status_update::comment::{CommentAuthor, FixedClock, SequentialCommentIds};
use crate::workflows::status_update::domain::{
    Actor, ApplicationStatus, ApplicationSummary, ReferenceNumber, StatusUpdateRequest,
};
use crate::workflows::status_update::form::StatusUpdateForm;
use crate::workflows::status_update::handler::{StatusUpdateHandler, UpdateError};
use crate::workflows::status_update::repository::{
    ApplicationRecord, ApplicationRepository, RepositoryError,
};
use crate::workflows::status_update::service::{ApplicationStatusService, CloseLatch};

pub(super) fn application() -> ApplicationSummary {
    summary("APP-100", "Grant X", ApplicationStatus::Pending)
}

pub(super) fn summary(reference: &str, title: &str, status: ApplicationStatus) -> ApplicationSummary {
    ApplicationSummary {
        reference_number: ReferenceNumber::from(reference),
        title: title.to_string(),
        status,
    }
}

pub(super) fn admin() -> Actor {
    Actor::new("Admin User", "admin")
}

pub(super) fn author() -> CommentAuthor {
    let instant = Utc
        .with_ymd_and_hms(2026, 10, 14, 9, 30, 0)
        .single()
        .expect("valid instant");
    CommentAuthor::with_sources(
        admin(),
        Arc::new(SequentialCommentIds::default()),
        Arc::new(FixedClock(instant)),
    )
}

/// Update handler that records every request and can be told to fail.
#[derive(Default)]
pub(super) struct RecordingHandler {
    requests: Mutex<Vec<StatusUpdateRequest>>,
    failure: Mutex<Option<String>>,
}

impl RecordingHandler {
    pub(super) fn failing(reason: &str) -> Self {
        let handler = Self::default();
        handler.fail_with(Some(reason));
        handler
    }

    pub(super) fn fail_with(&self, reason: Option<&str>) {
        *self.failure.lock().expect("failure mutex poisoned") = reason.map(str::to_string);
    }

    pub(super) fn requests(&self) -> Vec<StatusUpdateRequest> {
        self.requests.lock().expect("request mutex poisoned").clone()
    }
}

#[async_trait]
impl StatusUpdateHandler for RecordingHandler {
    async fn update_status(&self, request: StatusUpdateRequest) -> Result<(), UpdateError> {
        self.requests
            .lock()
            .expect("request mutex poisoned")
            .push(request);
        match self.failure.lock().expect("failure mutex poisoned").clone() {
            Some(reason) => Err(UpdateError::Rejected(reason)),
            None => Ok(()),
        }
    }
}

pub(super) type TestForm = StatusUpdateForm<RecordingHandler, CloseLatch>;

pub(super) fn open_form(
    handler: RecordingHandler,
) -> (TestForm, Arc<RecordingHandler>, Arc<CloseLatch>) {
    let handler = Arc::new(handler);
    let latch = Arc::new(CloseLatch::default());
    let form = StatusUpdateForm::new(application(), author(), handler.clone(), latch.clone());
    (form, handler, latch)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<BTreeMap<ReferenceNumber, ApplicationRecord>>,
}

impl MemoryRepository {
    pub(super) fn seeded() -> Self {
        let repository = Self::default();
        {
            let mut records = repository.records.lock().expect("repository mutex poisoned");
            for summary in [
                application(),
                summary(
                    "APP-101",
                    "Community Garden Expansion",
                    ApplicationStatus::NeedsRevision,
                ),
            ] {
                records.insert(
                    summary.reference_number.clone(),
                    ApplicationRecord::new(summary),
                );
            }
            if let Some(record) = records.get_mut(&ReferenceNumber::from("APP-101")) {
                record.revision_instructions = Some("Attach site plan".to_string());
            }
        }
        repository
    }
}

impl ApplicationRepository for MemoryRepository {
    fn fetch(
        &self,
        reference: &ReferenceNumber,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(reference).cloned())
    }

    fn list(&self) -> Result<Vec<ApplicationSummary>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().map(|record| record.summary.clone()).collect())
    }

    fn apply_status_change(
        &self,
        reference: &ReferenceNumber,
        request: StatusUpdateRequest,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard
            .get_mut(reference)
            .ok_or_else(|| RepositoryError::NotFound(reference.clone()))?;
        record.apply(request);
        Ok(record.clone())
    }
}

/// Serves reads but refuses writes.
pub(super) struct ReadOnlyRepository;

impl ApplicationRepository for ReadOnlyRepository {
    fn fetch(
        &self,
        reference: &ReferenceNumber,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        if reference.0 == "APP-100" {
            Ok(Some(ApplicationRecord::new(application())))
        } else {
            Ok(None)
        }
    }

    fn list(&self) -> Result<Vec<ApplicationSummary>, RepositoryError> {
        Ok(vec![application()])
    }

    fn apply_status_change(
        &self,
        _reference: &ReferenceNumber,
        _request: StatusUpdateRequest,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read-only replica".to_string()))
    }
}

pub(super) fn service<R>(repository: Arc<R>) -> Arc<ApplicationStatusService<R>>
where
    R: ApplicationRepository + 'static,
{
    Arc::new(ApplicationStatusService::new(repository, author()))
}

/// Update handler that never resolves.
#[derive(Default)]
pub(super) struct StalledHandler {
    calls: std::sync::atomic::AtomicUsize,
}

impl StalledHandler {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusUpdateHandler for StalledHandler {
    async fn update_status(&self, _request: StatusUpdateRequest) -> Result<(), UpdateError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(())
    }
}
