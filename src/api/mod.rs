//! Machine-facing HTTP surface and shared request middleware.
//!
//! # Modules
//!
//! - [`dto`] - JSON response bodies
//! - [`handlers`] - JSON endpoints
//! - [`middleware`] - Request tracing and rate limiting
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
