//! PostgreSQL implementation of invoice repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::{Invoice, InvoiceStatus, InvoiceSummary, InvoiceUpdate, NewInvoice};
use crate::domain::repositories::InvoiceRepository;
use crate::error::AppError;

/// PostgreSQL repository for invoice storage.
///
/// Every value is bound as a statement parameter. Ids arrive as text and are cast to
/// `uuid` inside the statement. An invoice id that is not a UUID cannot match a row
/// and is answered without a query; a malformed customer id is a database error.
pub struct PgInvoiceRepository {
    pool: Arc<PgPool>,
}

impl PgInvoiceRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct InvoiceRow {
    id: String,
    customer_id: String,
    amount: i64,
    status: String,
    date: NaiveDate,
}

#[derive(FromRow)]
struct InvoiceSummaryRow {
    id: String,
    name: String,
    email: String,
    amount: i64,
    status: String,
    date: NaiveDate,
}

/// `true` when `id` can name an invoice row.
fn is_invoice_id(id: &str) -> bool {
    let valid = Uuid::parse_str(id).is_ok();
    if !valid {
        debug!(id, "Invoice id is not a UUID");
    }
    valid
}

fn parse_status(raw: &str) -> Result<InvoiceStatus, AppError> {
    raw.parse().map_err(|_| {
        AppError::internal(
            "Corrupt invoice row",
            json!({ "reason": "unknown status", "status": raw }),
        )
    })
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = AppError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            status: parse_status(&row.status)?,
            id: row.id,
            customer_id: row.customer_id,
            amount_cents: row.amount,
            date: row.date,
        })
    }
}

impl TryFrom<InvoiceSummaryRow> for InvoiceSummary {
    type Error = AppError;

    fn try_from(row: InvoiceSummaryRow) -> Result<Self, Self::Error> {
        Ok(InvoiceSummary {
            status: parse_status(&row.status)?,
            id: row.id,
            customer_name: row.name,
            customer_email: row.email,
            amount_cents: row.amount,
            date: row.date,
        })
    }
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    async fn create(&self, new_invoice: NewInvoice) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1::uuid, $2, $3, $4)
            "#,
        )
        .bind(&new_invoice.customer_id)
        .bind(new_invoice.amount_cents)
        .bind(new_invoice.status.as_str())
        .bind(new_invoice.date)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn update(&self, id: &str, update: InvoiceUpdate) -> Result<bool, AppError> {
        if !is_invoice_id(id) {
            return Ok(false);
        }

        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $1::uuid, amount = $2, status = $3
            WHERE id = $4::uuid
            "#,
        )
        .bind(&update.customer_id)
        .bind(update.amount_cents)
        .bind(update.status.as_str())
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        if !is_invoice_id(id) {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1::uuid")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        if !is_invoice_id(id) {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id::text AS id, customer_id::text AS customer_id, amount, status, date
            FROM invoices
            WHERE id = $1::uuid
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Invoice::try_from).transpose()
    }

    async fn list_latest(&self, limit: i64) -> Result<Vec<InvoiceSummary>, AppError> {
        let rows = sqlx::query_as::<_, InvoiceSummaryRow>(
            r#"
            SELECT i.id::text AS id, c.name, c.email, i.amount, i.status, i.date
            FROM invoices i
            JOIN customers c ON c.id = i.customer_id
            ORDER BY i.date DESC, i.id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(InvoiceSummary::try_from).collect()
    }
}
