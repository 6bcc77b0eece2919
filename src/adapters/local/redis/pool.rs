//! Redis connection pool.

use super::error::RedisStoreError;
use deadpool_redis::{Config, Pool, Runtime};

/// Redis-backed video record store.
#[derive(Clone)]
pub struct RedisPool {
    pub(super) pool: Pool,
}

impl RedisPool {
    /// Create a new RedisPool with connection pool. Connections are opened
    /// lazily on first use.
    pub fn new(redis_url: &str) -> Result<Self, RedisStoreError> {
        let cfg = Config::from_url(redis_url);
        let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
        Ok(Self { pool })
    }
}
