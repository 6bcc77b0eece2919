//! Redis adapter for the video record store.
//!
//! Records are stored as JSON documents under `clipstow:video:<id>`.

mod error;
mod pool;
mod repository;

pub use error::RedisStoreError;
pub use pool::RedisPool;

const VIDEO_PREFIX: &str = "clipstow:video:";
