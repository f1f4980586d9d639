//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, InvoiceService};
use crate::domain::repositories::{CustomerRepository, InvoiceRepository, UserRepository};
use crate::infrastructure::cache::CacheService;

/// Invoice service over type-erased repositories.
pub type DynInvoiceService = InvoiceService<dyn InvoiceRepository, dyn CustomerRepository>;

/// Authentication service over a type-erased user store.
pub type DynAuthService = AuthService<dyn UserRepository>;

#[derive(Clone)]
pub struct AppState {
    pub invoice_service: Arc<DynInvoiceService>,
    pub auth_service: Arc<DynAuthService>,
    pub cache: Arc<dyn CacheService>,
    /// TTL applied to rendered pages stored in [`AppState::cache`].
    pub cache_ttl_seconds: u64,
}

impl AppState {
    pub fn new(
        invoice_service: Arc<DynInvoiceService>,
        auth_service: Arc<DynAuthService>,
        cache: Arc<dyn CacheService>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            invoice_service,
            auth_service,
            cache,
            cache_ttl_seconds,
        }
    }
}
