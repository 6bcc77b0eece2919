//! Local adapters for single-server deployment.

pub mod fs;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use fs::FsAdapter;
pub use memory::MemoryRepository;
#[cfg(feature = "redis")]
pub use redis::RedisPool;
