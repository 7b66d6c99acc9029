use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Case reference shown to reviewers, e.g. `APP-100`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReferenceNumber(pub String);

impl From<&str> for ReferenceNumber {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review lifecycle status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    #[serde(rename = "Document Verification")]
    DocumentVerification,
    #[serde(rename = "On Review")]
    OnReview,
    #[serde(rename = "Final Assessment")]
    FinalAssessment,
    #[serde(rename = "Needs Revision")]
    NeedsRevision,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Every selectable status, in the order reviewers see them.
    pub const ALL: [ApplicationStatus; 7] = [
        ApplicationStatus::Pending,
        ApplicationStatus::DocumentVerification,
        ApplicationStatus::OnReview,
        ApplicationStatus::FinalAssessment,
        ApplicationStatus::NeedsRevision,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    /// Machine value carried on the wire.
    pub const fn value(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::DocumentVerification => "Document Verification",
            ApplicationStatus::OnReview => "On Review",
            ApplicationStatus::FinalAssessment => "Final Assessment",
            ApplicationStatus::NeedsRevision => "Needs Revision",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Reviewer-facing label; the current catalogue labels every status with its value.
    pub const fn label(self) -> &'static str {
        self.value()
    }

    /// Whether selecting this status asks the applicant to amend their materials.
    pub const fn requires_revision_instructions(self) -> bool {
        matches!(self, ApplicationStatus::NeedsRevision)
    }

    pub fn options() -> Vec<StatusOption> {
        Self::ALL.iter().copied().map(StatusOption::from).collect()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ApplicationStatus {
    type Err = StatusParseError;

    /// Accepts the machine value as well as looser CLI spellings such as
    /// `needs-revision` or `final_assessment`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        ApplicationStatus::ALL
            .iter()
            .copied()
            .find(|status| status.value().replace(' ', "").to_ascii_lowercase() == normalized)
            .ok_or_else(|| StatusParseError(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}'")]
pub struct StatusParseError(pub String);

/// Value/label pair a presentation layer renders as a select option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl From<ApplicationStatus> for StatusOption {
    fn from(status: ApplicationStatus) -> Self {
        Self {
            value: status.value(),
            label: status.label(),
        }
    }
}

/// Read-only snapshot of the application being reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub reference_number: ReferenceNumber,
    pub title: String,
    pub status: ApplicationStatus,
}

/// Reviewer on whose behalf a comment is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub role: String,
}

impl Actor {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub String);

/// Annotation attached to a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: CommentId,
    pub user: String,
    pub role: String,
    pub message: String,
    pub timestamp: String,
    /// Set for administrative status-change comments, unset for ordinary remarks.
    pub is_official: bool,
}

/// Payload handed to the update handler for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
    pub comment: CommentRecord,
    /// `None` unless `status` is [`ApplicationStatus::NeedsRevision`].
    pub revision_instructions: Option<String>,
}
