//! Invoice pages and form actions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::json;

use crate::application::forms::{DeleteInvoiceForm, FormState, InvoiceForm};
use crate::application::services::ActionOutcome;
use crate::application::services::invoice_service::INVOICES_ROUTE;
use crate::application::services::session_service::SessionClaims;
use crate::domain::entities::{Customer, Invoice, InvoiceStatus, InvoiceSummary, format_currency};
use crate::error::AppError;
use crate::state::AppState;

/// One row of the invoice table, pre-formatted for display.
pub struct InvoiceRow {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub amount: String,
    pub date: String,
    pub status: &'static str,
    pub paid: bool,
}

impl From<&InvoiceSummary> for InvoiceRow {
    fn from(invoice: &InvoiceSummary) -> Self {
        Self {
            id: invoice.id.clone(),
            customer_name: invoice.customer_name.clone(),
            customer_email: invoice.customer_email.clone(),
            amount: format_currency(invoice.amount_cents),
            date: invoice.date.format("%b %-d, %Y").to_string(),
            status: invoice.status.as_str(),
            paid: invoice.status == InvoiceStatus::Paid,
        }
    }
}

/// Invoice list page. The rendering is shared through the page cache, so it
/// carries no per-user data.
#[derive(Template, WebTemplate)]
#[template(path = "invoices.html")]
pub struct InvoicesTemplate {
    pub invoices: Vec<InvoiceRow>,
    pub message: Option<String>,
}

pub struct CustomerOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Create and edit form page.
#[derive(Template, WebTemplate)]
#[template(path = "invoice_form.html")]
pub struct InvoiceFormTemplate {
    pub title: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub user_email: String,
    pub customers: Vec<CustomerOption>,
    pub amount: String,
    pub pending_checked: bool,
    pub paid_checked: bool,
    pub customer_errors: Vec<String>,
    pub amount_errors: Vec<String>,
    pub status_errors: Vec<String>,
    pub message: Option<String>,
}

enum FormMode<'a> {
    Create,
    Edit(&'a str),
}

impl InvoiceFormTemplate {
    fn new(
        mode: FormMode<'_>,
        claims: &SessionClaims,
        customers: &[Customer],
        values: &InvoiceForm,
        state: &FormState,
    ) -> Self {
        let (title, action, submit_label) = match mode {
            FormMode::Create => ("Create Invoice", INVOICES_ROUTE.to_string(), "Create Invoice"),
            FormMode::Edit(id) => (
                "Edit Invoice",
                format!("{}/{}/edit", INVOICES_ROUTE, id),
                "Edit Invoice",
            ),
        };

        let selected = values.customer_id.as_deref().unwrap_or_default();
        let status = values.status.as_deref().unwrap_or_default();

        Self {
            title,
            action,
            submit_label,
            user_email: claims.email.clone(),
            customers: customers
                .iter()
                .map(|c| CustomerOption {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    selected: c.id == selected,
                })
                .collect(),
            amount: values.amount.clone().unwrap_or_default(),
            pending_checked: status == InvoiceStatus::Pending.as_str(),
            paid_checked: status == InvoiceStatus::Paid.as_str(),
            customer_errors: state.errors_for("customerId").to_vec(),
            amount_errors: state.errors_for("amount").to_vec(),
            status_errors: state.errors_for("status").to_vec(),
            message: state.message.clone(),
        }
    }
}

/// Prefills the edit form from a stored invoice.
fn form_values(invoice: &Invoice) -> InvoiceForm {
    InvoiceForm {
        customer_id: Some(invoice.customer_id.clone()),
        amount: Some(format!(
            "{}.{:02}",
            invoice.amount_cents / 100,
            invoice.amount_cents % 100
        )),
        status: Some(invoice.status.as_str().to_string()),
    }
}

fn render<T: Template>(template: &T) -> Result<String, AppError> {
    template.render().map_err(|e| {
        AppError::internal(
            "Template rendering failed",
            json!({ "reason": e.to_string() }),
        )
    })
}

async fn render_invoice_list(state: &AppState, message: Option<String>) -> Result<String, AppError> {
    let invoices = state.invoice_service.list_invoices().await?;

    render(&InvoicesTemplate {
        invoices: invoices.iter().map(InvoiceRow::from).collect(),
        message,
    })
}

/// Renders the invoice list, served from the page cache when present.
///
/// # Endpoint
///
/// `GET /dashboard/invoices`
pub async fn invoices_handler(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    if let Ok(Some(html)) = state.cache.get_page(INVOICES_ROUTE).await {
        return Ok(Html(html));
    }

    let html = render_invoice_list(&state, None).await?;

    if let Err(e) = state
        .cache
        .set_page(INVOICES_ROUTE, &html, Some(state.cache_ttl_seconds))
        .await
    {
        tracing::warn!("Failed to cache {}: {}", INVOICES_ROUTE, e);
    }

    Ok(Html(html))
}

/// Renders the create form.
///
/// # Endpoint
///
/// `GET /dashboard/invoices/create`
pub async fn create_invoice_page_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<InvoiceFormTemplate, AppError> {
    let customers = state.invoice_service.list_customers().await?;

    Ok(InvoiceFormTemplate::new(
        FormMode::Create,
        &claims,
        &customers,
        &InvoiceForm::default(),
        &FormState::default(),
    ))
}

/// Renders the edit form prefilled with the stored invoice.
///
/// # Endpoint
///
/// `GET /dashboard/invoices/{id}/edit`
///
/// # Errors
///
/// - `404 Not Found` if the invoice does not exist
pub async fn edit_invoice_page_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<String>,
) -> Result<InvoiceFormTemplate, AppError> {
    let invoice = state.invoice_service.find_invoice(&id).await?;
    let customers = state.invoice_service.list_customers().await?;

    Ok(InvoiceFormTemplate::new(
        FormMode::Edit(&id),
        &claims,
        &customers,
        &form_values(&invoice),
        &FormState::default(),
    ))
}

/// Re-renders a form with the submitted values and the rejection state.
async fn rejected_form(
    state: &AppState,
    mode: FormMode<'_>,
    claims: &SessionClaims,
    values: &InvoiceForm,
    form_state: &FormState,
) -> Result<Response, AppError> {
    let customers = state.invoice_service.list_customers().await?;
    let page = InvoiceFormTemplate::new(mode, claims, &customers, values, form_state);

    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

/// Creates an invoice.
///
/// # Endpoint
///
/// `POST /dashboard/invoices`
///
/// # Response
///
/// - `303 See Other` to `/dashboard/invoices` on success
/// - `422 Unprocessable Entity` with the form and its errors otherwise
pub async fn create_invoice_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Form(form): Form<InvoiceForm>,
) -> Result<Response, AppError> {
    match state.invoice_service.create_invoice(&form).await {
        ActionOutcome::Redirect(to) => Ok(Redirect::to(&to).into_response()),
        ActionOutcome::Rejected(form_state) => {
            rejected_form(&state, FormMode::Create, &claims, &form, &form_state).await
        }
    }
}

/// Updates an invoice.
///
/// # Endpoint
///
/// `POST /dashboard/invoices/{id}/edit`
///
/// # Response
///
/// - `303 See Other` to `/dashboard/invoices` on success
/// - `422 Unprocessable Entity` with the form and its errors otherwise
pub async fn update_invoice_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<String>,
    Form(form): Form<InvoiceForm>,
) -> Result<Response, AppError> {
    match state.invoice_service.update_invoice(&id, &form).await {
        ActionOutcome::Redirect(to) => Ok(Redirect::to(&to).into_response()),
        ActionOutcome::Rejected(form_state) => {
            rejected_form(&state, FormMode::Edit(&id), &claims, &form, &form_state).await
        }
    }
}

/// Maps a delete result to a response. A no-op returns to the list.
async fn delete_response(
    state: &AppState,
    outcome: Option<ActionOutcome>,
) -> Result<Response, AppError> {
    match outcome {
        None => Ok(Redirect::to(INVOICES_ROUTE).into_response()),
        Some(ActionOutcome::Redirect(to)) => Ok(Redirect::to(&to).into_response()),
        Some(ActionOutcome::Rejected(form_state)) => {
            let html = render_invoice_list(state, form_state.message).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response())
        }
    }
}

/// Deletes the invoice named in the path.
///
/// # Endpoint
///
/// `POST /dashboard/invoices/{id}/delete`
pub async fn delete_invoice_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let outcome = state.invoice_service.delete_invoice(&id).await;
    delete_response(&state, outcome).await
}

/// Deletes the invoice named by the `invoiceId` form field.
///
/// # Endpoint
///
/// `POST /dashboard/invoices/delete`
pub async fn delete_invoice_form_handler(
    State(state): State<AppState>,
    Form(form): Form<DeleteInvoiceForm>,
) -> Result<Response, AppError> {
    let outcome = state.invoice_service.delete_invoice_with_id(&form).await;
    delete_response(&state, outcome).await
}
