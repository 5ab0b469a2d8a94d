// HTTP API error rendering
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};

use crate::feedback::FeedbackError;
use crate::middleware::response::JSON_CONTENT_TYPE;

/// How domain error kinds map onto HTTP status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ErrorStatusPolicy {
    /// Every error is a 500, whatever caused it
    #[default]
    Uniform,
    /// 400 for bad input, 409 for duplicates, 503 when the store is unreachable, 500 otherwise
    PerKind,
}

impl ErrorStatusPolicy {
    pub fn status_for(self, err: &FeedbackError) -> StatusCode {
        match self {
            ErrorStatusPolicy::Uniform => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorStatusPolicy::PerKind => match err {
                FeedbackError::DuplicateEntry => StatusCode::CONFLICT,
                e if e.is_client_error() => StatusCode::BAD_REQUEST,
                e if e.is_store_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// A domain error on its way to the wire, rendered as `{"error": "<message>"}`
#[derive(Debug)]
pub struct ApiError {
    error: FeedbackError,
    policy: ErrorStatusPolicy,
}

impl ApiError {
    pub fn new(error: FeedbackError, policy: ErrorStatusPolicy) -> Self {
        Self { error, policy }
    }

    pub fn error(&self) -> &FeedbackError {
        &self.error
    }

    pub fn status_code(&self) -> StatusCode {
        self.policy.status_for(&self.error)
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "error": self.error.to_string() })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.to_json().to_string();
        (
            self.status_code(),
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{StoreError, StoreErrorKind};

    fn all_errors() -> Vec<FeedbackError> {
        vec![
            FeedbackError::InvalidRating,
            FeedbackError::DuplicateEntry,
            FeedbackError::MissingSession,
            FeedbackError::MissingUser,
            FeedbackError::malformed("bad json"),
            StoreError::new(StoreErrorKind::Connectivity, "refused").into(),
            StoreError::other("syntax error").into(),
        ]
    }

    #[test]
    fn uniform_policy_is_always_500() {
        for err in all_errors() {
            assert_eq!(
                ErrorStatusPolicy::Uniform.status_for(&err),
                StatusCode::INTERNAL_SERVER_ERROR,
                "{err}"
            );
        }
    }

    #[test]
    fn per_kind_policy_distinguishes_causes() {
        let statuses: Vec<StatusCode> = all_errors()
            .iter()
            .map(|e| ErrorStatusPolicy::PerKind.status_for(e))
            .collect();
        assert_eq!(
            statuses,
            vec![
                StatusCode::BAD_REQUEST,
                StatusCode::CONFLICT,
                StatusCode::BAD_REQUEST,
                StatusCode::BAD_REQUEST,
                StatusCode::BAD_REQUEST,
                StatusCode::SERVICE_UNAVAILABLE,
                StatusCode::INTERNAL_SERVER_ERROR,
            ]
        );
    }

    #[test]
    fn body_wraps_message_under_error_key() {
        let err = ApiError::new(FeedbackError::InvalidRating, ErrorStatusPolicy::Uniform);
        assert_eq!(err.to_json(), json!({ "error": "rating invalid. has to be between 1-5" }));
    }

    #[test]
    fn response_carries_json_content_type() {
        let response = ApiError::new(FeedbackError::MissingUser, ErrorStatusPolicy::Uniform).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_CONTENT_TYPE
        );
    }
}
