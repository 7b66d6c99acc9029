use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::comment::CommentAuthor;
use super::domain::{
    Actor, ApplicationStatus, ApplicationSummary, ReferenceNumber, StatusUpdateRequest,
};
use super::form::{StatusUpdateForm, SubmitOutcome};
use super::handler::{CloseHandler, StatusUpdateHandler, UpdateError};
use super::repository::{ApplicationRecord, ApplicationRepository, RepositoryError};
use super::view::FormView;

/// Update handler that writes accepted requests to the repository.
pub struct RepositoryStatusUpdater<R> {
    repository: Arc<R>,
    reference: ReferenceNumber,
}

impl<R> RepositoryStatusUpdater<R> {
    pub fn new(repository: Arc<R>, reference: ReferenceNumber) -> Self {
        Self {
            repository,
            reference,
        }
    }
}

#[async_trait]
impl<R> StatusUpdateHandler for RepositoryStatusUpdater<R>
where
    R: ApplicationRepository + 'static,
{
    async fn update_status(&self, request: StatusUpdateRequest) -> Result<(), UpdateError> {
        self.repository
            .apply_status_change(&self.reference, request)?;
        Ok(())
    }
}

/// Values a presentation layer collected for one status change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeInput {
    pub status: ApplicationStatus,
    pub comment: String,
    #[serde(default)]
    pub revision_instructions: Option<String>,
}

#[derive(Debug)]
pub enum StatusChangeOutcome {
    Updated(ApplicationRecord),
    Rejected(FormView),
    Failed { error: UpdateError, form: FormView },
}

/// Close handler that remembers whether the form was dismissed.
#[derive(Debug, Default)]
pub struct CloseLatch {
    closes: AtomicUsize,
}

impl CloseLatch {
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::Acquire)
    }
}

impl CloseHandler for CloseLatch {
    fn close(&self) {
        self.closes.fetch_add(1, Ordering::AcqRel);
    }
}

/// Opens status forms for stored applications and completes them against the repository.
pub struct ApplicationStatusService<R> {
    repository: Arc<R>,
    author: CommentAuthor,
}

impl<R> ApplicationStatusService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>, author: CommentAuthor) -> Self {
        Self { repository, author }
    }

    pub fn default_actor(&self) -> &Actor {
        self.author.actor()
    }

    pub fn list(&self) -> Result<Vec<ApplicationSummary>, RepositoryError> {
        self.repository.list()
    }

    pub fn get(&self, reference: &ReferenceNumber) -> Result<ApplicationRecord, RepositoryError> {
        self.repository
            .fetch(reference)?
            .ok_or_else(|| RepositoryError::NotFound(reference.clone()))
    }

    /// Open a form for the stored application, attributing comments to `actor`
    /// or to the configured reviewer.
    pub fn open_form<C>(
        &self,
        reference: &ReferenceNumber,
        actor: Option<Actor>,
        on_close: Arc<C>,
    ) -> Result<StatusUpdateForm<RepositoryStatusUpdater<R>, C>, RepositoryError>
    where
        C: CloseHandler,
    {
        let record = self.get(reference)?;
        let author = match actor {
            Some(actor) => self.author.acting_as(actor),
            None => self.author.clone(),
        };
        let updater = Arc::new(RepositoryStatusUpdater::new(
            Arc::clone(&self.repository),
            reference.clone(),
        ));
        Ok(StatusUpdateForm::new(record.summary, author, updater, on_close))
    }

    /// Fill a fresh form with `input` and submit it once.
    pub async fn change_status(
        &self,
        reference: &ReferenceNumber,
        input: StatusChangeInput,
        actor: Option<Actor>,
    ) -> Result<StatusChangeOutcome, RepositoryError> {
        let latch = Arc::new(CloseLatch::default());
        let mut form = self.open_form(reference, actor, latch)?;

        form.select_status(input.status);
        form.set_comment(input.comment);
        if let Some(instructions) = input.revision_instructions {
            form.set_revision_instructions(instructions);
        }

        match form.submit().await {
            SubmitOutcome::Updated => Ok(StatusChangeOutcome::Updated(self.get(reference)?)),
            SubmitOutcome::Rejected(_) | SubmitOutcome::Ignored => {
                Ok(StatusChangeOutcome::Rejected(form.view()))
            }
            SubmitOutcome::Failed(error) => Ok(StatusChangeOutcome::Failed {
                error,
                form: form.view(),
            }),
        }
    }
}
