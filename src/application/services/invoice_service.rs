//! Invoice form actions: validate, persist, invalidate, redirect.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::application::forms::{DeleteInvoiceForm, FormState, InvoiceForm};
use crate::domain::entities::{Customer, Invoice, InvoiceSummary};
use crate::domain::repositories::{CustomerRepository, InvoiceRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Route whose cached rendering every invoice mutation invalidates and where
/// successful actions land.
pub const INVOICES_ROUTE: &str = "/dashboard/invoices";

/// Maximum number of invoices shown on the list page.
const LIST_LIMIT: i64 = 100;

/// What a create action does when the insert fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistenceErrorPolicy {
    /// Return "Database Error: Failed to Create Invoice." and stay on the form.
    #[default]
    Surface,
    /// Log the error and redirect as if the insert had succeeded.
    LogOnly,
}

impl FromStr for PersistenceErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "surface" => Ok(Self::Surface),
            "log" | "log_only" => Ok(Self::LogOnly),
            other => Err(format!("unknown persistence error policy '{}'", other)),
        }
    }
}

impl fmt::Display for PersistenceErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface => f.write_str("surface"),
            Self::LogOnly => f.write_str("log"),
        }
    }
}

/// Terminal result of a form action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Navigate to the given path. Nothing else happens after it.
    Redirect(String),
    /// Stay on the form and show the state.
    Rejected(FormState),
}

/// Orchestrates invoice form submissions.
///
/// Each action runs validation, one store call, route invalidation and redirect
/// strictly in that order. Validation failures never reach the store.
pub struct InvoiceService<I, C>
where
    I: InvoiceRepository + ?Sized,
    C: CustomerRepository + ?Sized,
{
    invoices: Arc<I>,
    customers: Arc<C>,
    cache: Arc<dyn CacheService>,
    create_error_policy: PersistenceErrorPolicy,
}

impl<I, C> InvoiceService<I, C>
where
    I: InvoiceRepository + ?Sized,
    C: CustomerRepository + ?Sized,
{
    /// Creates a new invoice service.
    pub fn new(
        invoices: Arc<I>,
        customers: Arc<C>,
        cache: Arc<dyn CacheService>,
        create_error_policy: PersistenceErrorPolicy,
    ) -> Self {
        Self {
            invoices,
            customers,
            cache,
            create_error_policy,
        }
    }

    /// Creates an invoice dated today (UTC).
    pub async fn create_invoice(&self, form: &InvoiceForm) -> ActionOutcome {
        let input = match form.parse() {
            Ok(input) => input,
            Err(errors) => {
                return ActionOutcome::Rejected(FormState::from_validation(
                    &errors,
                    "Missing Fields. Failed to Create Invoice.",
                ));
            }
        };

        let new_invoice = input.into_new_invoice(Utc::now().date_naive());

        if let Err(e) = self.invoices.create(new_invoice).await {
            tracing::error!("Failed to create invoice: {}", e);
            if self.create_error_policy == PersistenceErrorPolicy::Surface {
                return ActionOutcome::Rejected(FormState::message(
                    "Database Error: Failed to Create Invoice.",
                ));
            }
        }

        self.revalidate(INVOICES_ROUTE).await;
        ActionOutcome::Redirect(INVOICES_ROUTE.to_string())
    }

    /// Replaces customer, amount and status of invoice `id`. The date is kept.
    pub async fn update_invoice(&self, id: &str, form: &InvoiceForm) -> ActionOutcome {
        let input = match form.parse() {
            Ok(input) => input,
            Err(errors) => {
                return ActionOutcome::Rejected(FormState::from_validation(
                    &errors,
                    "Missing Fields. Failed to Update Invoice.",
                ));
            }
        };

        match self.invoices.update(id, input.into_update()).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!(invoice_id = id, "Update matched no invoice"),
            Err(e) => {
                tracing::error!(invoice_id = id, "Failed to update invoice: {}", e);
                return ActionOutcome::Rejected(FormState::message(
                    "Database Error: Failed to Update Invoice.",
                ));
            }
        }

        self.revalidate(INVOICES_ROUTE).await;
        ActionOutcome::Redirect(INVOICES_ROUTE.to_string())
    }

    /// Deletes invoice `id`.
    ///
    /// Returns `None` without touching the store when `id` is empty.
    pub async fn delete_invoice(&self, id: &str) -> Option<ActionOutcome> {
        if id.is_empty() {
            return None;
        }

        tracing::info!(invoice_id = id, "Deleting invoice");

        match self.invoices.delete(id).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!(invoice_id = id, "Delete matched no invoice"),
            Err(e) => {
                tracing::error!(invoice_id = id, "Failed to delete invoice: {}", e);
                return Some(ActionOutcome::Rejected(FormState::message(
                    "Database Error: Failed to Delete Invoice.",
                )));
            }
        }

        self.revalidate(INVOICES_ROUTE).await;
        Some(ActionOutcome::Redirect(INVOICES_ROUTE.to_string()))
    }

    /// Deletes the invoice named by the form's `invoiceId` field, if any.
    pub async fn delete_invoice_with_id(&self, form: &DeleteInvoiceForm) -> Option<ActionOutcome> {
        let id = form.invoice_id.as_deref().filter(|id| !id.is_empty())?;
        self.delete_invoice(id).await
    }

    /// Latest invoices with customer details, newest first.
    pub async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, AppError> {
        self.invoices.list_latest(LIST_LIMIT).await
    }

    /// Loads one invoice for editing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no invoice has this id.
    pub async fn find_invoice(&self, id: &str) -> Result<Invoice, AppError> {
        self.invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice not found", json!({ "id": id })))
    }

    /// Customers offered on the invoice forms.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        self.customers.list_all().await
    }

    /// Marks a route's cached rendering stale. Cache failures are logged only.
    async fn revalidate(&self, route: &str) {
        if let Err(e) = self.cache.invalidate(route).await {
            tracing::warn!("Failed to invalidate {}: {}", route, e);
        }
    }
}
