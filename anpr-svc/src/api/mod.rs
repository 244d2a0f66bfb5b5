//! HTTP endpoints for the recognition service

mod health;
mod recognize;

pub use health::{health_routes, HealthResponse};
pub use recognize::recognize_routes;
