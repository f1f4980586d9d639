//! Dashboard home handler.

use axum::response::Redirect;

use crate::application::services::invoice_service::INVOICES_ROUTE;

/// Sends visitors of `/` and `/dashboard` to the invoice list.
pub async fn dashboard_handler() -> Redirect {
    Redirect::to(INVOICES_ROUTE)
}
