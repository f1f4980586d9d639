//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache of rendered pages keyed by route path.
///
/// Mutations mark a route stale with [`CacheService::invalidate`] so the next
/// request regenerates it. Implementations must be thread-safe, and a cache
/// failure must degrade to rendering from the database rather than failing
/// the request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached rendering of `route`, if any.
    ///
    /// `Ok(None)` on miss. Production implementations report backend errors as misses.
    async fn get_page(&self, route: &str) -> CacheResult<Option<String>>;

    /// Stores the rendering of `route`.
    ///
    /// `ttl_seconds` falls back to an implementation default when `None`.
    async fn set_page(&self, route: &str, html: &str, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Marks the cached rendering of `route` stale.
    async fn invalidate(&self, route: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;
}
