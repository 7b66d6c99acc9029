use serde::Serialize;

use super::domain::{ApplicationStatus, ApplicationSummary};
use super::form::{FormNotice, FormState, SubmissionPhase};

/// Serializable snapshot of the form for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub application: ApplicationSummary,
    pub status_options: Vec<StatusOptionView>,
    pub selected_status: ApplicationStatus,
    pub comment: FieldView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_instructions: Option<FieldView>,
    pub controls_enabled: bool,
    pub submitting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub value: String,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Validation,
    SubmissionFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeView {
    pub kind: NoticeKind,
    pub message: String,
}

impl From<&FormNotice> for NoticeView {
    fn from(notice: &FormNotice) -> Self {
        let kind = match notice {
            FormNotice::Validation(_) => NoticeKind::Validation,
            FormNotice::SubmissionFailed(_) => NoticeKind::SubmissionFailed,
        };
        Self {
            kind,
            message: notice.message(),
        }
    }
}

impl FormView {
    pub(crate) fn render(
        application: &ApplicationSummary,
        state: &FormState,
        phase: SubmissionPhase,
        notice: Option<&FormNotice>,
    ) -> Self {
        let status_options = ApplicationStatus::options()
            .into_iter()
            .map(|option| StatusOptionView {
                value: option.value,
                label: option.label,
                selected: option.value == state.selected_status.value(),
            })
            .collect();

        let revision_instructions = state
            .selected_status
            .requires_revision_instructions()
            .then(|| FieldView {
                value: state.revision_instructions.clone(),
                required: true,
            });

        Self {
            application: application.clone(),
            status_options,
            selected_status: state.selected_status,
            comment: FieldView {
                value: state.comment.clone(),
                required: true,
            },
            revision_instructions,
            controls_enabled: phase == SubmissionPhase::Idle,
            submitting: phase == SubmissionPhase::Submitting,
            notice: notice.map(NoticeView::from),
        }
    }
}
