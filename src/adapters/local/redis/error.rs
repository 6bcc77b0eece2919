//! Redis error types for the local adapter.

use crate::ports::repository::RepositoryError;
use deadpool_redis::CreatePoolError;
use thiserror::Error;

pub type RedisError = deadpool_redis::redis::RedisError;
pub type PoolError = deadpool_redis::PoolError;

#[derive(Debug, Error)]
pub enum RedisStoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("Create pool error: {0}")]
    CreatePool(#[from] CreatePoolError),
}

impl From<RedisStoreError> for RepositoryError {
    fn from(err: RedisStoreError) -> Self {
        RepositoryError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::local::redis::RedisPool;

    #[test]
    fn test_bad_url_is_a_create_pool_error() {
        let err = match RedisPool::new("not a redis url") {
            Ok(_) => panic!("pool created from an invalid url"),
            Err(err) => err,
        };
        assert!(matches!(err, RedisStoreError::CreatePool(_)));

        match RepositoryError::from(err) {
            RepositoryError::Backend(message) => {
                assert!(message.starts_with("Create pool error: "), "{message}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
