//! Web dashboard route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    create_invoice_handler, create_invoice_page_handler, dashboard_handler,
    delete_invoice_form_handler, delete_invoice_handler, edit_invoice_page_handler,
    invoices_handler, login_handler, login_page_handler, logout_handler, update_invoice_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Protected dashboard routes requiring a session.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET  /dashboard` - Redirect to the invoice list
/// - `GET  /dashboard/invoices` - Invoice list (page cached)
/// - `POST /dashboard/invoices` - Create invoice
/// - `GET  /dashboard/invoices/create` - Create form
/// - `POST /dashboard/invoices/delete` - Delete invoice named by `invoiceId`
/// - `GET  /dashboard/invoices/{id}/edit` - Edit form
/// - `POST /dashboard/invoices/{id}/edit` - Update invoice
/// - `POST /dashboard/invoices/{id}/delete` - Delete invoice
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route(
            "/dashboard/invoices",
            get(invoices_handler).post(create_invoice_handler),
        )
        .route(
            "/dashboard/invoices/create",
            get(create_invoice_page_handler),
        )
        .route(
            "/dashboard/invoices/delete",
            post(delete_invoice_form_handler),
        )
        .route(
            "/dashboard/invoices/{id}/edit",
            get(edit_invoice_page_handler).post(update_invoice_handler),
        )
        .route(
            "/dashboard/invoices/{id}/delete",
            post(delete_invoice_handler),
        )
}

/// Public sign-in routes.
///
/// # Endpoints
///
/// - `GET  /login` - Login page
/// - `POST /login` - Sign in with email and password
/// - `POST /logout` - Clear the session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page_handler).post(login_handler))
        .route("/logout", post(logout_handler))
}
