use async_trait::async_trait;

use super::domain::StatusUpdateRequest;
use super::repository::RepositoryError;

/// Persistence operation invoked once per validated submission.
#[async_trait]
pub trait StatusUpdateHandler: Send + Sync {
    async fn update_status(&self, request: StatusUpdateRequest) -> Result<(), UpdateError>;
}

/// Dismisses the form; called on cancel and after a successful update.
pub trait CloseHandler: Send + Sync {
    fn close(&self);
}

impl<F> CloseHandler for F
where
    F: Fn() + Send + Sync,
{
    fn close(&self) {
        self()
    }
}

/// Failure reported by an update handler.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
