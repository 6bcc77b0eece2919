pub mod ingest;
pub mod receiver;

pub use ingest::IngestService;
pub use receiver::{accept_media_type, stage_upload, ReceiveError, ACCEPTED_MEDIA_TYPE};
