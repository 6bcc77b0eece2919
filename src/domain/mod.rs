//! Domain layer - Pure business logic.

pub mod asset;
pub mod probe;
pub mod shape;
pub mod video;

pub use asset::{AssetError, RemuxedAsset, StagedUpload, StorageKey};
pub use probe::{ProbeResult, StreamDescriptor};
pub use shape::ShapeCategory;
pub use video::VideoRecord;
