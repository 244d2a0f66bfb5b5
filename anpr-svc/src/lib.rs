//! anpr-svc library interface
//!
//! Exposes the recognition pipeline and router for integration testing.

pub mod api;
pub mod config;
pub mod engine;
pub mod pipeline;
pub mod store;

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::engine::PlateReader;
use crate::store::ImageStore;

/// Application state shared across HTTP handlers
///
/// Engine and store handles are read-only after startup; concurrent
/// requests share them without locking.
#[derive(Clone)]
pub struct AppState {
    /// Loaded recognition model handle
    pub engine: Arc<dyn PlateReader>,
    /// Remote image store client
    pub store: Arc<dyn ImageStore>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: Arc<dyn PlateReader>, store: Arc<dyn ImageStore>) -> Self {
        Self {
            engine,
            store,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::recognize_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
