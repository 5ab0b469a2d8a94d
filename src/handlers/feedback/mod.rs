// handlers/feedback - GET /list and POST /:session_id

use axum::{
    extract::State,
    http::{Method, Uri},
};
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;
use crate::feedback::FeedbackError;

mod list;
mod submit;

pub use list::{list_entries, ListQuery, DEFAULT_LIMIT};
pub use submit::{submit_entry, submit_list_session, SubmitBody, LIST_SESSION, USER_ID_HEADER};

/// Any path or method without a route; answered through the JSON error path
pub async fn unmatched(State(state): State<AppState>, method: Method, uri: Uri) -> ApiError {
    debug!(%method, %uri, "no route");
    ApiError::new(
        FeedbackError::malformed(format!("no route for {method} {}", uri.path())),
        state.error_status,
    )
}
