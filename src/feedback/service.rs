use std::sync::Arc;

use tracing::{debug, Instrument, Span};

use super::entry::{Entry, NewEntry};
use super::error::FeedbackError;
use super::repository::EntryRepository;

/// Validates submissions and forwards reads to the repository
pub struct FeedbackService {
    span: Span,
    repo: Arc<dyn EntryRepository>,
}

impl FeedbackService {
    /// `parent` is the logging context the service nests its own span under
    pub fn new(parent: &Span, repo: Arc<dyn EntryRepository>) -> Self {
        let span = tracing::info_span!(parent: parent, "feedback", component = "feedback.service");
        Self { span, repo }
    }

    /// Store an entry after checking the rating range. Repository errors,
    /// including duplicates, are returned unchanged.
    pub async fn add(&self, entry: NewEntry) -> Result<(), FeedbackError> {
        async {
            if !entry.has_valid_rating() {
                debug!(rating = entry.rating, "rejecting out-of-range rating");
                return Err(FeedbackError::InvalidRating);
            }
            self.repo.add(entry).await
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn get_latest(&self, limit: u32) -> Result<Vec<Entry>, FeedbackError> {
        self.repo
            .get_latest(limit)
            .instrument(self.span.clone())
            .await
    }

    /// The filter is not range checked; out-of-range values simply match nothing.
    pub async fn get_latest_filtered(&self, limit: u32, filter: i32) -> Result<Vec<Entry>, FeedbackError> {
        self.repo
            .get_latest_filtered(limit, filter)
            .instrument(self.span.clone())
            .await
    }
}
