#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use tower::ServiceExt;
use tracing::Span;

use feedback_api::error::ErrorStatusPolicy;
use feedback_api::feedback::FeedbackService;
use feedback_api::testing::MemoryRepository;
use feedback_api::{app, AppState};

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_repo(MemoryRepository::new(), ErrorStatusPolicy::Uniform)
    }

    pub fn with_repo(repo: MemoryRepository, policy: ErrorStatusPolicy) -> Self {
        let repo = Arc::new(repo);
        let service = Arc::new(FeedbackService::new(&Span::none(), repo.clone()));
        let state = AppState::new(service, repo.clone(), policy);
        Self {
            router: app(state),
            repo,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        read_json(response).await
    }

    pub async fn submit(&self, session: &str, user: Option<&str>, body: &str) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(format!("/{session}"))
            .header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder.header("Ubi-UserId", user);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn list(&self, query: &str) -> (StatusCode, serde_json::Value) {
        let uri = if query.is_empty() {
            "/list".to_string()
        } else {
            format!("/list?{query}")
        };
        self.send(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("response is not JSON ({e}): {}", String::from_utf8_lossy(&body)));
    (status, value)
}

pub fn error_message(body: &serde_json::Value) -> &str {
    body.get("error")
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| panic!("missing error field: {body}"))
}
