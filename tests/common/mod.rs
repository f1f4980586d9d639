#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use invoice_dashboard::application::services::{
    AuthConfig, AuthService, InvoiceService, PersistenceErrorPolicy, SessionService,
};
use invoice_dashboard::domain::entities::{
    Customer, Invoice, InvoiceSummary, InvoiceUpdate, NewInvoice, User,
};
use invoice_dashboard::domain::repositories::{
    CustomerRepository, InvoiceRepository, UserRepository,
};
use invoice_dashboard::error::AppError;
use invoice_dashboard::infrastructure::cache::{CacheResult, CacheService};
use invoice_dashboard::state::{AppState, DynAuthService, DynInvoiceService};
use invoice_dashboard::{routes, web};

pub const SESSION_SECRET: &str = "test-session-secret-with-32-bytes!";
pub const USER_EMAIL: &str = "user@nextmail.com";
pub const USER_PASSWORD: &str = "123456";

// ─── In-memory stores ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    customers: Vec<Customer>,
    invoices: Mutex<Vec<Invoice>>,
    next_id: Mutex<u32>,
    /// When set, every write fails like a lost database connection.
    pub fail_writes: Mutex<bool>,
}

impl InMemoryInvoiceRepository {
    pub fn new(customers: Vec<Customer>) -> Self {
        Self {
            customers,
            ..Self::default()
        }
    }

    pub fn insert(&self, invoice: Invoice) {
        self.invoices.lock().unwrap().push(invoice);
    }

    pub fn all(&self) -> Vec<Invoice> {
        self.invoices.lock().unwrap().clone()
    }

    pub fn get(&self, id: &str) -> Option<Invoice> {
        self.all().into_iter().find(|i| i.id == id)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(())
    }

    /// Mirrors the `amount > 0` column check.
    fn check_amount(&self, amount_cents: i64) -> Result<(), AppError> {
        if amount_cents > 0 {
            Ok(())
        } else {
            Err(AppError::internal("Database error", json!({})))
        }
    }

    fn check_customer(&self, customer_id: &str) -> Result<(), AppError> {
        if self.customers.iter().any(|c| c.id == customer_id) {
            Ok(())
        } else {
            Err(AppError::internal("Database error", json!({})))
        }
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn create(&self, new_invoice: NewInvoice) -> Result<(), AppError> {
        self.check_writable()?;
        self.check_customer(&new_invoice.customer_id)?;
        self.check_amount(new_invoice.amount_cents)?;

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        self.insert(Invoice {
            id: format!("inv-{}", next_id),
            customer_id: new_invoice.customer_id,
            amount_cents: new_invoice.amount_cents,
            status: new_invoice.status,
            date: new_invoice.date,
        });
        Ok(())
    }

    async fn update(&self, id: &str, update: InvoiceUpdate) -> Result<bool, AppError> {
        self.check_writable()?;
        self.check_customer(&update.customer_id)?;
        self.check_amount(update.amount_cents)?;

        let mut invoices = self.invoices.lock().unwrap();
        match invoices.iter_mut().find(|i| i.id == id) {
            Some(invoice) => {
                invoice.customer_id = update.customer_id;
                invoice.amount_cents = update.amount_cents;
                invoice.status = update.status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        self.check_writable()?;

        let mut invoices = self.invoices.lock().unwrap();
        let before = invoices.len();
        invoices.retain(|i| i.id != id);
        Ok(invoices.len() < before)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        Ok(self.get(id))
    }

    async fn list_latest(&self, limit: i64) -> Result<Vec<InvoiceSummary>, AppError> {
        let mut invoices = self.all();
        invoices.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(invoices
            .into_iter()
            .take(limit as usize)
            .filter_map(|i| {
                let customer = self.customers.iter().find(|c| c.id == i.customer_id)?;
                Some(InvoiceSummary {
                    id: i.id,
                    customer_name: customer.name.clone(),
                    customer_email: customer.email.clone(),
                    amount_cents: i.amount_cents,
                    status: i.status,
                    date: i.date,
                })
            })
            .collect())
    }
}

pub struct InMemoryCustomerRepository(pub Vec<Customer>);

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn list_all(&self) -> Result<Vec<Customer>, AppError> {
        let mut customers = self.0.clone();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }
}

pub struct InMemoryUserRepository(pub Vec<User>);

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.0.iter().find(|u| u.email == email).cloned())
    }
}

/// Page cache that keeps pages in memory and records invalidations.
#[derive(Default)]
pub struct RecordingCache {
    pages: Mutex<HashMap<String, String>>,
    pub invalidations: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub fn page(&self, route: &str) -> Option<String> {
        self.pages.lock().unwrap().get(route).cloned()
    }

    pub fn invalidations(&self) -> Vec<String> {
        self.invalidations.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheService for RecordingCache {
    async fn get_page(&self, route: &str) -> CacheResult<Option<String>> {
        Ok(self.page(route))
    }

    async fn set_page(&self, route: &str, html: &str, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        self.pages
            .lock()
            .unwrap()
            .insert(route.to_string(), html.to_string());
        Ok(())
    }

    async fn invalidate(&self, route: &str) -> CacheResult<()> {
        self.pages.lock().unwrap().remove(route);
        self.invalidations.lock().unwrap().push(route.to_string());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub fn customers() -> Vec<Customer> {
    vec![
        Customer {
            id: "c1".to_string(),
            name: "Delba de Oliveira".to_string(),
            email: "delba@oliveira.com".to_string(),
            image_url: "/customers/delba-de-oliveira.png".to_string(),
        },
        Customer {
            id: "c2".to_string(),
            name: "Lee Robinson".to_string(),
            email: "lee@robinson.com".to_string(),
            image_url: "/customers/lee-robinson.png".to_string(),
        },
    ]
}

pub fn user() -> User {
    User {
        id: "410544b2-4001-4271-9855-fec4b6a6442a".to_string(),
        name: "User".to_string(),
        email: USER_EMAIL.to_string(),
        password: bcrypt::hash(USER_PASSWORD, 4).unwrap(),
    }
}

pub fn invoice(id: &str, customer_id: &str, amount_cents: i64, date: (i32, u32, u32)) -> Invoice {
    Invoice {
        id: id.to_string(),
        customer_id: customer_id.to_string(),
        amount_cents,
        status: invoice_dashboard::domain::entities::InvoiceStatus::Pending,
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
    }
}

/// Application wired over in-memory stores.
pub struct TestApp {
    pub server: TestServer,
    pub invoices: Arc<InMemoryInvoiceRepository>,
    pub cache: Arc<RecordingCache>,
    pub sessions: Arc<SessionService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(PersistenceErrorPolicy::Surface)
    }

    pub fn with_policy(policy: PersistenceErrorPolicy) -> Self {
        let invoices = Arc::new(InMemoryInvoiceRepository::new(customers()));
        let cache = Arc::new(RecordingCache::default());
        let sessions = Arc::new(SessionService::new(SESSION_SECRET.to_string(), 3600));

        let invoice_repository: Arc<dyn InvoiceRepository> = invoices.clone();
        let customer_repository: Arc<dyn CustomerRepository> =
            Arc::new(InMemoryCustomerRepository(customers()));
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(InMemoryUserRepository(vec![user()]));
        let page_cache: Arc<dyn CacheService> = cache.clone();

        let invoice_service: Arc<DynInvoiceService> = Arc::new(InvoiceService::new(
            invoice_repository,
            customer_repository,
            page_cache.clone(),
            policy,
        ));
        let auth_service: Arc<DynAuthService> = Arc::new(AuthService::new(
            user_repository,
            sessions.clone(),
            AuthConfig::default(),
        ));

        let state = AppState::new(invoice_service, auth_service, page_cache, 60);
        let app = routes::site_router(state, web::routes::public_routes());

        Self {
            server: TestServer::new(app).unwrap(),
            invoices,
            cache,
            sessions,
        }
    }

    /// `Cookie` header value carrying a valid session for the fixture user.
    pub fn session_cookie(&self) -> String {
        format!("session={}", self.sessions.issue(&user()).unwrap())
    }
}

// ─── Database helpers ────────────────────────────────────────────────────────

pub async fn create_test_customer(pool: &PgPool, name: &str, email: &str) -> String {
    sqlx::query_scalar::<_, String>(
        "INSERT INTO customers (name, email, image_url) VALUES ($1, $2, '') RETURNING id::text",
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn count_invoices(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices")
        .fetch_one(pool)
        .await
        .unwrap()
}
