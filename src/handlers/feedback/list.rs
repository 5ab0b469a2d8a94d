use axum::extract::{rejection::QueryRejection, Query, State};
use serde::Deserialize;
use tracing::error;

use crate::app::AppState;
use crate::error::ApiError;
use crate::feedback::{Entry, FeedbackError};
use crate::middleware::{ApiResponse, ApiResult};

/// Number of entries returned when no `limit` is given
pub const DEFAULT_LIMIT: u32 = 15;

/// Raw query parameters; parsed by hand so bad values go through the JSON error path
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub filter: Option<String>,
}

/// GET /list?limit=<uint>&filter=<int> - newest entries first
pub async fn list_entries(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<Entry>> {
    let result = async {
        let Query(query) = query.map_err(|e| FeedbackError::malformed(e.body_text()))?;
        let limit = parse_limit(query.limit.as_deref())?;

        match parse_filter(query.filter.as_deref())? {
            Some(filter) => state.service.get_latest_filtered(limit, filter).await,
            None => state.service.get_latest(limit).await,
        }
    }
    .await;

    match result {
        Ok(entries) => Ok(ApiResponse::success(entries)),
        Err(e) => {
            error!(error = %e, "failed listing entries");
            Err(ApiError::new(e, state.error_status))
        }
    }
}

// An empty value (`?limit=`) counts as absent.
fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

fn parse_limit(raw: Option<&str>) -> Result<u32, FeedbackError> {
    match non_empty(raw) {
        None => Ok(DEFAULT_LIMIT),
        Some(s) => s
            .parse::<u32>()
            .map_err(|e| FeedbackError::malformed(format!("invalid limit {s:?}: {e}"))),
    }
}

fn parse_filter(raw: Option<&str>) -> Result<Option<i32>, FeedbackError> {
    non_empty(raw)
        .map(|s| {
            s.parse::<i32>()
                .map_err(|e| FeedbackError::malformed(format!("invalid filter {s:?}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_parses() {
        assert_eq!(parse_limit(None).unwrap(), DEFAULT_LIMIT);
        assert_eq!(parse_limit(Some("")).unwrap(), DEFAULT_LIMIT);
        assert_eq!(parse_limit(Some("0")).unwrap(), 0);
        assert_eq!(parse_limit(Some("40")).unwrap(), 40);
    }

    #[test]
    fn limit_rejects_non_numeric_and_negative() {
        for raw in ["x", "-1", "1.5", "99999999999"] {
            assert!(
                matches!(parse_limit(Some(raw)), Err(FeedbackError::MalformedRequest(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn filter_accepts_any_integer() {
        assert_eq!(parse_filter(None).unwrap(), None);
        assert_eq!(parse_filter(Some("3")).unwrap(), Some(3));
        assert_eq!(parse_filter(Some("-7")).unwrap(), Some(-7));
        assert!(matches!(parse_filter(Some("abc")), Err(FeedbackError::MalformedRequest(_))));
    }
}
