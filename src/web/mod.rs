//! Web dashboard layer for browser-based UI.
//!
//! Provides the sign-in pages and the invoice pages with their form actions.
//! Uses Askama templates for server-side rendering.
//!
//! # Modules
//!
//! - [`handlers`] - Page rendering and form action handlers
//! - [`middleware`] - Session cookie authentication
//! - [`routes`] - Dashboard route configuration

pub mod handlers;
pub mod middleware;
pub mod routes;
