//! ATS Analysis Service
//!
//! HTTP wrapper around the ATS engine. Fetches the optional qualitative
//! assessment, runs the deterministic pipeline and returns the combined
//! analysis. Bind to 127.0.0.1 by default (internal only).

pub mod assessor;
pub mod config;
pub mod error;
mod handlers;
mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use handlers::{analyze, health, AnalyzeRequest, AnalyzeResponse};
pub use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/analyze", post(analyze))
    .layer(CorsLayer::permissive())
    .with_state(state)
}
