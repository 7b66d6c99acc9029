use case_review::workflows::status_update::{
    ApplicationRecord, ApplicationRepository, ApplicationStatus, ApplicationSummary,
    ReferenceNumber, RepositoryError, StatusUpdateRequest,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<BTreeMap<ReferenceNumber, ApplicationRecord>>>,
}

impl InMemoryApplicationRepository {
    /// Repository preloaded with the demo caseload.
    pub(crate) fn seeded() -> Self {
        let repository = Self::default();
        for (reference, title, status) in [
            ("APP-100", "Grant X", ApplicationStatus::Pending),
            (
                "APP-101",
                "Community Garden Expansion",
                ApplicationStatus::DocumentVerification,
            ),
            (
                "APP-102",
                "Youth Coding Bootcamp",
                ApplicationStatus::OnReview,
            ),
            (
                "APP-103",
                "Riverside Clean-up Fund",
                ApplicationStatus::FinalAssessment,
            ),
        ] {
            repository.insert(ApplicationRecord::new(ApplicationSummary {
                reference_number: ReferenceNumber::from(reference),
                title: title.to_string(),
                status,
            }));
        }
        repository
    }

    pub(crate) fn insert(&self, record: ApplicationRecord) {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.reference_number().clone(), record);
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
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

pub(crate) fn parse_status(raw: &str) -> Result<ApplicationStatus, String> {
    raw.parse::<ApplicationStatus>().map_err(|err| {
        let choices: Vec<_> = ApplicationStatus::ALL
            .iter()
            .map(|status| status.value())
            .collect();
        format!("{err} (expected one of: {})", choices.join(", "))
    })
}
