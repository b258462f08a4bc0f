//! Redis-backed `AvailabilityCache` implementation.
//!
//! Stores the derived available-units count under one namespaced key.
//! Pooling goes through `bb8-redis`, mirroring the persistence side. The
//! adapter reports every failure through the port error type; the services
//! and the reconciler decide that those failures are non-fatal.

use async_trait::async_trait;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use bb8_redis::RedisConnectionManager;

use crate::domain::ports::{AvailabilityCache, AvailabilityCacheError};

/// Namespaced key holding the available-units count.
pub(crate) const AVAILABLE_UNITS_KEY: &str = "staybook:units:available-count";

/// Redis-backed implementation of the availability cache port.
#[derive(Clone, Debug)]
pub struct RedisAvailabilityCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisAvailabilityCache {
    /// Connect to Redis and build the connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`AvailabilityCacheError::Connection`] when the URL is
    /// invalid or the pool cannot be built.
    pub async fn connect(
        redis_url: &str,
        max_pool_size: u32,
    ) -> Result<Self, AvailabilityCacheError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| AvailabilityCacheError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(max_pool_size)
            .build(manager)
            .await
            .map_err(|err| AvailabilityCacheError::connection(err.to_string()))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl AvailabilityCache for RedisAvailabilityCache {
    async fn get_count(&self) -> Result<Option<u64>, AvailabilityCacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| AvailabilityCacheError::connection(err.to_string()))?;

        let count: Option<u64> = conn
            .get(AVAILABLE_UNITS_KEY)
            .await
            .map_err(|err| AvailabilityCacheError::command(err.to_string()))?;
        Ok(count)
    }

    async fn put_count(&self, count: u64) -> Result<(), AvailabilityCacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| AvailabilityCacheError::connection(err.to_string()))?;

        let _: () = conn
            .set(AVAILABLE_UNITS_KEY, count)
            .await
            .map_err(|err| AvailabilityCacheError::command(err.to_string()))?;
        Ok(())
    }

    async fn invalidate(&self) -> Result<(), AvailabilityCacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| AvailabilityCacheError::connection(err.to_string()))?;

        let _: () = conn
            .del(AVAILABLE_UNITS_KEY)
            .await
            .map_err(|err| AvailabilityCacheError::command(err.to_string()))?;
        Ok(())
    }
}
