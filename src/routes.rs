//! Top-level router configuration combining web and JSON routes.
//!
//! # Route Structure
//!
//! - `GET  /`                 - Redirect to the invoice list
//! - `GET  /health`           - Health check: DB, cache (public)
//! - `/login`, `/logout`      - Sign-in pages (public, rate limited)
//! - `/dashboard/*`           - Invoice pages and form actions (cookie session required)
//! - `/static/*`              - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the sign-in pages
//! - **Authentication** - Signed session cookie on dashboard routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::handlers::dashboard_handler;
use crate::web::middleware::web_auth;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// The server must be started with connect info; the sign-in rate limiter keys on
/// the peer address.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let public = web::routes::public_routes().layer(rate_limit::login_layer());

    NormalizePathLayer::trim_trailing_slash().layer(site_router(state, public))
}

/// Mounts every route around `public`, the router serving the sign-in pages.
pub fn site_router(state: AppState, public: Router<AppState>) -> Router {
    let protected = web::routes::protected_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        web_auth::layer,
    ));

    Router::new()
        .route("/", get(dashboard_handler))
        .merge(api::routes::public_routes())
        .merge(public)
        .merge(protected)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer())
}
