//! Storage capability used by the feedback service.
//!
//! Backends classify their own failures into [`StoreErrorKind`] before
//! handing them up, so nothing above this trait ever sees a driver error.

use std::fmt;

use async_trait::async_trait;

use super::entry::{Entry, NewEntry};
use super::error::FeedbackError;

/// Coarse classification every backing store must apply to its failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// A uniqueness (or other integrity) constraint rejected the write
    ConstraintViolation,
    /// The store could not be reached or the pool is exhausted/closed
    Connectivity,
    Other,
}

/// Backend-neutral store failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Other, message)
    }

    pub fn is_constraint_violation(&self) -> bool {
        self.kind == StoreErrorKind::ConstraintViolation
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error: {}", self.message)
    }
}

impl std::error::Error for StoreError {}

/// Persistence and retrieval of feedback entries.
///
/// Reads return entries newest first (descending id) and never more than
/// `limit` of them; a limit of zero yields an empty list.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Insert one entry. A second entry for the same (session, user) pair
    /// fails with [`FeedbackError::DuplicateEntry`].
    async fn add(&self, entry: NewEntry) -> Result<(), FeedbackError>;

    async fn get_latest(&self, limit: u32) -> Result<Vec<Entry>, FeedbackError>;

    /// Same as [`EntryRepository::get_latest`] restricted to `rating == filter`
    async fn get_latest_filtered(&self, limit: u32, filter: i32) -> Result<Vec<Entry>, FeedbackError>;
}

/// Liveness check for the backing store, used by the health endpoint
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}
