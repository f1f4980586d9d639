//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! statement parameters.
//!
//! # Repositories
//!
//! - [`PgInvoiceRepository`] - Invoice storage and retrieval
//! - [`PgCustomerRepository`] - Customer listing
//! - [`PgUserRepository`] - User lookup for sign-in

pub mod pg_customer_repository;
pub mod pg_invoice_repository;
pub mod pg_user_repository;

pub use pg_customer_repository::PgCustomerRepository;
pub use pg_invoice_repository::PgInvoiceRepository;
pub use pg_user_repository::PgUserRepository;
