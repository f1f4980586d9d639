//! Redis-backed page cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache for rendered pages.
///
/// Uses `ConnectionManager` for connection reuse. All operations are fail-open:
/// errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`CacheService::set_page`] is called
    ///   without one; controlled via `CACHE_TTL_SECONDS`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "page:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, route: &str) -> String {
        format!("{}{}", self.key_prefix, route)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_page(&self, route: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(route);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(html)) => {
                debug!(route, "Cache HIT");
                Ok(Some(html))
            }
            Ok(None) => {
                debug!(route, "Cache MISS");
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", route, e);
                Ok(None)
            }
        }
    }

    async fn set_page(
        &self,
        route: &str,
        html: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.build_key(route);
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        match conn.set_ex::<_, _, ()>(&key, html, ttl).await {
            Ok(_) => {
                debug!(route, ttl, "Cache SET");
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", route, e);
                Ok(())
            }
        }
    }

    async fn invalidate(&self, route: &str) -> CacheResult<()> {
        let key = self.build_key(route);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!(route, "Cache INVALIDATE");
                }
                Ok(())
            }
            Err(e) => {
                warn!("Redis DEL error for {}: {}", route, e);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
