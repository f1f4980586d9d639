//! PostgreSQL implementation of customer repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::Customer;
use crate::domain::repositories::CustomerRepository;
use crate::error::AppError;

pub struct PgCustomerRepository {
    pool: Arc<PgPool>,
}

#[derive(FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    email: String,
    image_url: String,
}

impl PgCustomerRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Inserts a customer and returns its id. Used by the admin CLI.
    pub async fn create(&self, name: &str, email: &str, image_url: &str) -> Result<String, AppError> {
        let id = sqlx::query_scalar::<_, String>(
            "INSERT INTO customers (name, email, image_url) VALUES ($1, $2, $3) RETURNING id::text",
        )
        .bind(name)
        .bind(email)
        .bind(image_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(id)
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn list_all(&self) -> Result<Vec<Customer>, AppError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT id::text AS id, name, email, image_url FROM customers ORDER BY name ASC",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Customer {
                id: r.id,
                name: r.name,
                email: r.email,
                image_url: r.image_url,
            })
            .collect())
    }
}
