//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without persistence concerns.
//!
//! # Entity Types
//!
//! - [`Invoice`] - A bill issued to a customer
//! - [`Customer`] - The party an invoice is issued to
//! - [`User`] - A dashboard user who can sign in
//!
//! Creation and mutation use dedicated input structs ([`NewInvoice`],
//! [`InvoiceUpdate`]) so that server-owned fields such as `id` and `date`
//! can't be set from the outside.

pub mod customer;
pub mod invoice;
pub mod user;

pub use customer::Customer;
pub use invoice::{
    Invoice, InvoiceStatus, InvoiceSummary, InvoiceUpdate, NewInvoice, format_currency,
};
pub use user::User;
