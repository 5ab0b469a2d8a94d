use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ErrorStatusPolicy;
use crate::feedback::{FeedbackService, StoreHealth};
use crate::handlers::{self, feedback::unmatched};

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FeedbackService>,
    pub store: Arc<dyn StoreHealth>,
    pub error_status: ErrorStatusPolicy,
}

impl AppState {
    pub fn new(
        service: Arc<FeedbackService>,
        store: Arc<dyn StoreHealth>,
        error_status: ErrorStatusPolicy,
    ) -> Self {
        Self {
            service,
            store,
            error_status,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health).fallback(unmatched))
        .route(
            "/list",
            get(handlers::feedback::list_entries)
                .post(handlers::feedback::submit_list_session)
                .fallback(unmatched),
        )
        // a bare POST / still reaches the handler so it can report the missing session
        .route("/", post(handlers::feedback::submit_entry).fallback(unmatched))
        .route("/:session_id", post(handlers::feedback::submit_entry).fallback(unmatched))
        .fallback(unmatched)
        .with_state(state)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
