//! Status update workflow for a single application record.
//!
//! [`StatusUpdateForm`] is a headless form controller: it owns the entered
//! values, validates them, hands one [`StatusUpdateRequest`] to an injected
//! [`StatusUpdateHandler`] per submission, and reports completion through a
//! [`CloseHandler`]. [`ApplicationStatusService`] and [`status_router`] wire
//! it to an [`ApplicationRepository`].

pub mod comment;
pub mod domain;
pub mod form;
pub mod handler;
pub mod repository;
pub mod router;
pub mod service;
pub mod view;

#[cfg(test)]
mod tests;

pub use comment::{
    Clock, CommentAuthor, CommentIdGenerator, FixedClock, SequentialCommentIds, SystemClock,
    UuidCommentIds,
};
pub use domain::{
    Actor, ApplicationStatus, ApplicationSummary, CommentId, CommentRecord, ReferenceNumber,
    StatusOption, StatusParseError, StatusUpdateRequest,
};
pub use form::{
    FormNotice, FormState, StatusUpdateForm, SubmissionPhase, Submission, SubmitOutcome,
    ValidationError,
};
pub use handler::{CloseHandler, StatusUpdateHandler, UpdateError};
pub use repository::{ApplicationRecord, ApplicationRepository, RepositoryError};
pub use router::status_router;
pub use service::{
    ApplicationStatusService, CloseLatch, RepositoryStatusUpdater, StatusChangeInput,
    StatusChangeOutcome,
};
pub use view::{FieldView, FormView, NoticeKind, NoticeView, StatusOptionView};
