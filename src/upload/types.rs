use std::path::PathBuf;

/// A video file queued for upload plus the form metadata that rides along
/// with it. Immutable once submitted.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_path: PathBuf,
    /// Ratio of decoy entries the server injects into the playlist.
    pub injection_ratio: f32,
}

/// Intermediate percent-complete notification, in [0, 100]. Values never
/// decrease within one upload and reach 100 before a success.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    pub percent: f32,
}

/// Terminal result of one upload. No further events follow it.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    Success {
        video_id: String,
        playlist_url: Option<String>,
    },
    Failure {
        message: String,
    },
}

/// Message sent from the upload worker back to the UI thread.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Progress(ProgressEvent),
    Finished(UploadOutcome),
}
