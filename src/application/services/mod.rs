//! Business logic services for the application layer.

pub mod auth_service;
pub mod invoice_service;
pub mod session_service;

pub use auth_service::{AuthConfig, AuthService};
pub use invoice_service::{ActionOutcome, InvoiceService, PersistenceErrorPolicy};
pub use session_service::SessionService;
