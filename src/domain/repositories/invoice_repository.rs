//! Repository trait for invoice data access.

use crate::domain::entities::{Invoice, InvoiceSummary, InvoiceUpdate, NewInvoice};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing invoices.
///
/// All statements are parameterized; identifiers are passed through as opaque
/// strings and cast by the store.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgInvoiceRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Inserts a new invoice.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including an unknown or
    /// malformed customer id.
    async fn create(&self, new_invoice: NewInvoice) -> Result<(), AppError>;

    /// Replaces customer, amount and status of invoice `id`.
    ///
    /// Returns `Ok(false)` when no invoice matched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: &str, update: InvoiceUpdate) -> Result<bool, AppError>;

    /// Deletes invoice `id`.
    ///
    /// Returns `Ok(false)` when no invoice matched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Finds a single invoice by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, AppError>;

    /// Lists the most recent invoices joined with their customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_latest(&self, limit: i64) -> Result<Vec<InvoiceSummary>, AppError>;
}
