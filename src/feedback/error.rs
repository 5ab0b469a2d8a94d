use thiserror::Error;

use super::repository::{StoreError, StoreErrorKind};

/// Domain errors surfaced by the feedback handler, service and repository
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("rating invalid. has to be between 1-5")]
    InvalidRating,

    #[error("entries may only be sent once per user/session")]
    DuplicateEntry,

    #[error("no sessionID provided")]
    MissingSession,

    #[error("no userID provided")]
    MissingUser,

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error(transparent)]
    StoreFailure(#[from] StoreError),
}

impl FeedbackError {
    pub fn malformed(message: impl Into<String>) -> Self {
        FeedbackError::MalformedRequest(message.into())
    }

    /// True for errors caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FeedbackError::InvalidRating
                | FeedbackError::MissingSession
                | FeedbackError::MissingUser
                | FeedbackError::MalformedRequest(_)
        )
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            FeedbackError::StoreFailure(StoreError { kind: StoreErrorKind::Connectivity, .. })
        )
    }
}
