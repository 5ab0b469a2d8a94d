use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::{debug, error, Instrument, Span};

use crate::database::manager::classify;
use crate::feedback::{Entry, EntryRepository, FeedbackError, NewEntry, StoreError};

const INSERT_ENTRY: &str =
    "INSERT INTO entries (session_id, user_id, rating, comment) VALUES ($1, $2, $3, $4)";

const SELECT_LATEST: &str = "SELECT id, session_id, user_id, rating, comment FROM entries \
     ORDER BY id DESC LIMIT $1";

const SELECT_LATEST_FILTERED: &str = "SELECT id, session_id, user_id, rating, comment FROM entries \
     WHERE rating = $2 ORDER BY id DESC LIMIT $1";

#[derive(Debug, FromRow)]
struct EntryRow {
    id: i64,
    session_id: String,
    user_id: String,
    rating: i32,
    comment: String,
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Entry {
            id: row.id.to_string(),
            session_id: row.session_id,
            user_id: row.user_id,
            rating: row.rating,
            comment: row.comment,
        }
    }
}

/// Postgres-backed [`EntryRepository`] over the `entries` table
pub struct PgEntryRepository {
    span: Span,
    pool: PgPool,
}

impl PgEntryRepository {
    pub fn new(parent: &Span, pool: PgPool) -> Self {
        let span = tracing::info_span!(parent: parent, "database", component = "database");
        Self { span, pool }
    }

    async fn fetch_latest(&self, limit: u32, filter: Option<i32>) -> Result<Vec<Entry>, StoreError> {
        let query = match filter {
            Some(rating) => sqlx::query_as::<_, EntryRow>(SELECT_LATEST_FILTERED)
                .bind(i64::from(limit))
                .bind(rating),
            None => sqlx::query_as::<_, EntryRow>(SELECT_LATEST).bind(i64::from(limit)),
        };

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            error!(limit, ?filter, error = %e, "get entries failed");
            classify(&e)
        })?;

        Ok(rows.into_iter().map(Entry::from).collect())
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn add(&self, entry: NewEntry) -> Result<(), FeedbackError> {
        async {
            debug!(session = %entry.session_id, user = %entry.user_id, "adding entry");

            let result = sqlx::query(INSERT_ENTRY)
                .bind(&entry.session_id)
                .bind(&entry.user_id)
                .bind(entry.rating)
                .bind(&entry.comment)
                .execute(&self.pool)
                .await;

            match result {
                Ok(_) => Ok(()),
                Err(e) => {
                    let store_err = classify(&e);
                    if store_err.is_constraint_violation() {
                        debug!(session = %entry.session_id, user = %entry.user_id, "duplicate entry");
                        return Err(FeedbackError::DuplicateEntry);
                    }
                    error!(
                        session = %entry.session_id,
                        user = %entry.user_id,
                        error = %e,
                        "exec error"
                    );
                    Err(FeedbackError::StoreFailure(store_err))
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }

    async fn get_latest(&self, limit: u32) -> Result<Vec<Entry>, FeedbackError> {
        async {
            debug!(limit, "reading entries");
            let entries = self.fetch_latest(limit, None).await?;
            debug!(limit, entries = entries.len(), "finished reading entries");
            Ok::<_, FeedbackError>(entries)
        }
        .instrument(self.span.clone())
        .await
    }

    async fn get_latest_filtered(&self, limit: u32, filter: i32) -> Result<Vec<Entry>, FeedbackError> {
        async {
            debug!(limit, filter, "reading entries");
            let entries = self.fetch_latest(limit, Some(filter)).await?;
            debug!(limit, filter, entries = entries.len(), "finished reading entries");
            Ok::<_, FeedbackError>(entries)
        }
        .instrument(self.span.clone())
        .await
    }
}
