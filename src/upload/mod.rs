mod coordinator;
mod types;

pub use coordinator::UploadCoordinator;
pub use types::{ProgressEvent, UploadEvent, UploadOutcome, UploadRequest};
