//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access so that services can be exercised with
//! mocks or in-memory stores. Concrete PostgreSQL implementations live in
//! `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`InvoiceRepository`] - Invoice CRUD operations
//! - [`CustomerRepository`] - Customer listing for forms
//! - [`UserRepository`] - User lookup by email for sign-in
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` under `cfg(test)`.
//! See `tests/repository_*.rs` for database-backed usage.

pub mod customer_repository;
pub mod invoice_repository;
pub mod user_repository;

pub use customer_repository::CustomerRepository;
pub use invoice_repository::InvoiceRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
#[cfg(test)]
pub use invoice_repository::MockInvoiceRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
