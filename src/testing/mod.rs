//! In-memory [`EntryRepository`] for exercising the service and HTTP layers
//! without a running Postgres.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::feedback::{Entry, EntryRepository, FeedbackError, NewEntry, StoreError, StoreHealth};

#[derive(Default)]
pub struct MemoryRepository {
    rows: RwLock<Vec<Entry>>,
    next_id: AtomicUsize,
    failure: Option<StoreError>,
    add_calls: AtomicUsize,
    read_calls: AtomicUsize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails with `failure`
    pub fn failing(failure: StoreError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), FeedbackError> {
        match &self.failure {
            Some(failure) => Err(FeedbackError::StoreFailure(failure.clone())),
            None => Ok(()),
        }
    }

    async fn latest_where(&self, limit: u32, keep: impl Fn(&Entry) -> bool) -> Vec<Entry> {
        // rows are appended in id order, so newest first is a reverse walk
        self.rows
            .read()
            .await
            .iter()
            .rev()
            .filter(|e| keep(*e))
            .take(limit as usize)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EntryRepository for MemoryRepository {
    async fn add(&self, entry: NewEntry) -> Result<(), FeedbackError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let mut rows = self.rows.write().await;
        let duplicate = rows
            .iter()
            .any(|e| e.session_id == entry.session_id && e.user_id == entry.user_id);
        if duplicate {
            return Err(FeedbackError::DuplicateEntry);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        rows.push(entry.into_entry(id.to_string()));
        Ok(())
    }

    async fn get_latest(&self, limit: u32) -> Result<Vec<Entry>, FeedbackError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.latest_where(limit, |_| true).await)
    }

    async fn get_latest_filtered(&self, limit: u32, filter: i32) -> Result<Vec<Entry>, FeedbackError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.latest_where(limit, |e| e.rating == filter).await)
    }
}

#[async_trait]
impl StoreHealth for MemoryRepository {
    async fn ping(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}
