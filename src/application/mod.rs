//! Application layer: form handling and business logic.
//!
//! Services orchestrate domain operations by coordinating repository calls,
//! validation and cache invalidation. They consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::invoice_service::InvoiceService`] - Invoice create, update and delete actions
//! - [`services::auth_service::AuthService`] - Credentials sign-in
//! - [`services::session_service::SessionService`] - Signed session cookies

pub mod forms;
pub mod services;
