use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::feedback::{FeedbackError, NewEntry};
use crate::middleware::{ApiResponse, ApiResult};

/// Trusted header carrying the submitting user's id
pub const USER_ID_HEADER: &str = "Ubi-UserId";

/// Accepted request body. Any session or user ids in the body are ignored.
#[derive(Debug, Deserialize)]
pub struct SubmitBody {
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Session segment that collides with the static `/list` route
pub const LIST_SESSION: &str = "list";

/// POST /:session_id - submit one rating for the session as the header's user
pub async fn submit_entry(
    State(state): State<AppState>,
    session: Option<Path<String>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Value> {
    submit(state, session.map(|Path(id)| id), headers, body).await
}

/// POST /list - the `/list` route shadows `/:session_id`, so a session named
/// "list" is submitted here
pub async fn submit_list_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Value> {
    submit(state, Some(LIST_SESSION.to_string()), headers, body).await
}

async fn submit(
    state: AppState,
    session: Option<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Value> {
    let result = async {
        let session_id = session
            .filter(|id| !id.is_empty())
            .ok_or(FeedbackError::MissingSession)?;

        let user_id = headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(FeedbackError::MissingUser)?;

        let submitted: SubmitBody = serde_json::from_slice(&body)
            .map_err(|e| FeedbackError::malformed(format!("invalid JSON body: {e}")))?;

        debug!(session = %session_id, user = %user_id, "submitting entry");
        let entry = NewEntry::new(
            session_id,
            user_id,
            submitted.rating,
            submitted.comment.unwrap_or_default(),
        );
        state.service.add(entry).await
    }
    .await;

    match result {
        Ok(()) => Ok(ApiResponse::success(json!({}))),
        Err(e) => {
            warn!(error = %e, "failed adding entry");
            Err(ApiError::new(e, state.error_status))
        }
    }
}
