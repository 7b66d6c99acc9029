use std::sync::Arc;

use tracing::{info, warn};

use super::comment::CommentAuthor;
use super::domain::{ApplicationStatus, ApplicationSummary, StatusUpdateRequest};
use super::handler::{CloseHandler, StatusUpdateHandler, UpdateError};
use super::view::FormView;

/// Values entered by the reviewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub selected_status: ApplicationStatus,
    pub comment: String,
    /// Kept while another status is selected, but only sent for `Needs Revision`.
    pub revision_instructions: String,
}

impl FormState {
    fn for_application(application: &ApplicationSummary) -> Self {
        Self {
            selected_status: application.status,
            comment: String::new(),
            revision_instructions: String::new(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.comment.trim().is_empty() {
            return Err(ValidationError::EmptyComment);
        }
        if self.selected_status.requires_revision_instructions()
            && self.revision_instructions.trim().is_empty()
        {
            return Err(ValidationError::MissingRevisionInstructions);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    /// A request is with the update handler; submit and cancel are disabled.
    Submitting,
    /// Dismissed by cancel or a successful update. Terminal.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please add a comment before updating the status.")]
    EmptyComment,
    #[error("Revision instructions are required when requesting a revision.")]
    MissingRevisionInstructions,
}

/// Inline message shown above the form controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNotice {
    Validation(ValidationError),
    SubmissionFailed(String),
}

impl FormNotice {
    pub fn message(&self) -> String {
        match self {
            FormNotice::Validation(error) => error.to_string(),
            FormNotice::SubmissionFailed(reason) => {
                format!("Failed to update status: {reason}")
            }
        }
    }
}

/// Result of [`StatusUpdateForm::prepare_submission`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Validation passed and the form is now `Submitting`.
    Ready(StatusUpdateRequest),
    Rejected(ValidationError),
    /// The form is already submitting or closed.
    Ignored,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// The handler accepted the update and the form closed.
    Updated,
    Rejected(ValidationError),
    Failed(UpdateError),
    Ignored,
}

/// Headless status update form for one application.
///
/// Drives `Idle -> Validating -> (Idle | Submitting -> (Closed | Idle))`. The
/// update handler is called at most once per validated submission and the
/// close handler at most once over the form's lifetime.
pub struct StatusUpdateForm<H, C> {
    application: ApplicationSummary,
    author: CommentAuthor,
    on_update: Arc<H>,
    on_close: Arc<C>,
    state: FormState,
    phase: SubmissionPhase,
    notice: Option<FormNotice>,
}

impl<H, C> StatusUpdateForm<H, C>
where
    H: StatusUpdateHandler,
    C: CloseHandler,
{
    pub fn new(
        application: ApplicationSummary,
        author: CommentAuthor,
        on_update: Arc<H>,
        on_close: Arc<C>,
    ) -> Self {
        let state = FormState::for_application(&application);
        Self {
            application,
            author,
            on_update,
            on_close,
            state,
            phase: SubmissionPhase::Idle,
            notice: None,
        }
    }

    pub fn application(&self) -> &ApplicationSummary {
        &self.application
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn notice(&self) -> Option<&FormNotice> {
        self.notice.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    pub fn controls_enabled(&self) -> bool {
        self.phase == SubmissionPhase::Idle
    }

    /// The revision instructions field is rendered, and required, only for `Needs Revision`.
    pub fn revision_instructions_visible(&self) -> bool {
        self.state.selected_status.requires_revision_instructions()
    }

    pub fn select_status(&mut self, status: ApplicationStatus) -> bool {
        self.edit(|state| state.selected_status = status)
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> bool {
        let comment = comment.into();
        self.edit(|state| state.comment = comment)
    }

    pub fn set_revision_instructions(&mut self, instructions: impl Into<String>) -> bool {
        let instructions = instructions.into();
        self.edit(|state| state.revision_instructions = instructions)
    }

    fn edit(&mut self, apply: impl FnOnce(&mut FormState)) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        apply(&mut self.state);
        true
    }

    /// Dismiss the form. No-op while a submission is in flight or after close.
    pub fn cancel(&mut self) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        info!(reference = %self.application.reference_number, "status update cancelled");
        self.close();
        true
    }

    /// Validate the entered values and, on success, enter `Submitting` with
    /// the request the caller must hand to the update handler.
    pub fn prepare_submission(&mut self) -> Submission {
        if !self.controls_enabled() {
            return Submission::Ignored;
        }

        self.notice = None;
        if let Err(error) = self.state.validate() {
            warn!(
                reference = %self.application.reference_number,
                %error,
                "status update rejected by validation"
            );
            self.notice = Some(FormNotice::Validation(error));
            return Submission::Rejected(error);
        }

        let status = self.state.selected_status;
        let revision_instructions = status
            .requires_revision_instructions()
            .then(|| self.state.revision_instructions.clone());
        let request = StatusUpdateRequest {
            status,
            comment: self.author.official_comment(self.state.comment.clone()),
            revision_instructions,
        };

        self.phase = SubmissionPhase::Submitting;
        info!(
            reference = %self.application.reference_number,
            from = %self.application.status,
            to = %status,
            comment_id = %request.comment.id.0,
            "submitting status update"
        );
        Submission::Ready(request)
    }

    /// Record the handler's answer for the in-flight submission.
    pub fn finish_submission(&mut self, result: Result<(), UpdateError>) -> SubmitOutcome {
        if self.phase != SubmissionPhase::Submitting {
            return SubmitOutcome::Ignored;
        }

        match result {
            Ok(()) => {
                info!(
                    reference = %self.application.reference_number,
                    status = %self.state.selected_status,
                    "status updated"
                );
                self.close();
                SubmitOutcome::Updated
            }
            Err(error) => {
                warn!(
                    reference = %self.application.reference_number,
                    %error,
                    "status update failed"
                );
                self.phase = SubmissionPhase::Idle;
                self.notice = Some(FormNotice::SubmissionFailed(error.to_string()));
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Validate, call the update handler, and settle the outcome.
    ///
    /// In-flight submissions cannot be aborted. If this future is dropped
    /// before the handler resolves, the form returns to `Idle` with its values
    /// intact so it can be retried or cancelled; whether the handler applied
    /// the change is then unknown to the form.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let request = match self.prepare_submission() {
            Submission::Ready(request) => request,
            Submission::Rejected(error) => return SubmitOutcome::Rejected(error),
            Submission::Ignored => return SubmitOutcome::Ignored,
        };

        let handler = Arc::clone(&self.on_update);
        let result = {
            let mut in_flight = InFlight {
                phase: &mut self.phase,
                settled: false,
            };
            let result = handler.update_status(request).await;
            in_flight.settled = true;
            result
        };
        self.finish_submission(result)
    }

    pub fn view(&self) -> FormView {
        FormView::render(
            &self.application,
            &self.state,
            self.phase,
            self.notice.as_ref(),
        )
    }

    fn close(&mut self) {
        self.phase = SubmissionPhase::Closed;
        self.on_close.close();
    }
}

/// Returns an abandoned submission to `Idle`.
struct InFlight<'a> {
    phase: &'a mut SubmissionPhase,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled && *self.phase == SubmissionPhase::Submitting {
            *self.phase = SubmissionPhase::Idle;
        }
    }
}

impl<H, C> std::fmt::Debug for StatusUpdateForm<H, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusUpdateForm")
            .field("application", &self.application)
            .field("author", &self.author)
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}
