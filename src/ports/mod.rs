//! Ports - Traits at every external seam of the ingest pipeline.

pub mod auth;
pub mod media;
pub mod repository;
pub mod storage;

pub use auth::{AuthError, TokenValidator};
pub use media::{MediaError, MediaToolkit};
pub use repository::{RepositoryError, VideoRepository};
pub use storage::{ObjectStore, StorageError};
