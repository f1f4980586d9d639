//! JSON endpoint routes.

use crate::api::handlers::health_handler;
use crate::state::AppState;
use axum::{Router, routing::get};

/// Public JSON routes.
///
/// # Endpoints
///
/// - `GET /health` - Database and cache health
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
