use crate::api::types::{CdnStatus, VideoEntry};
use crate::upload::{UploadEvent, UploadOutcome};
use derivative::Derivative;
use std::sync::mpsc::Receiver;

/// Where the current upload stands. One-way traffic:
/// `Idle → InProgress → Terminal`, then back to `InProgress` only when a new
/// upload starts.
#[derive(Clone, Debug, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    InProgress {
        percent: f32,
    },
    Terminal(UploadOutcome),
}

/// Result of a background server call, rendered as a colored status line in
/// the panel that triggered it.
#[derive(Debug, Clone)]
pub struct Notice {
    pub success: bool,
    pub text: String,
}

impl Notice {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            success: false,
            text: text.into(),
        }
    }
}

/// Transient UI state plus the channels the worker threads report through.
/// The egui loop drains the receivers every frame; they exist only while the
/// matching operation is in flight.
#[derive(Derivative, Default)]
#[derivative(Debug)]
pub struct AppState {
    pub phase: UploadPhase,
    pub is_uploading: bool,
    pub upload_notice: Option<Notice>,

    pub videos: Vec<VideoEntry>,
    pub videos_error: Option<String>,
    pub videos_loading: bool,
    pub videos_notice: Option<Notice>,
    pub is_deleting: bool,
    /// Video id whose Delete button is armed, awaiting the confirming click.
    pub pending_delete: Option<String>,

    pub cdn_status: Option<Result<CdnStatus, String>>,
    pub is_cdn_uploading: bool,
    pub cdn_notice: Option<Notice>,
    pub cookie_notice: Option<Notice>,

    #[derivative(Debug = "ignore")]
    pub upload_receiver: Option<Receiver<UploadEvent>>,
    #[derivative(Debug = "ignore")]
    pub videos_receiver: Option<Receiver<Result<Vec<VideoEntry>, String>>>,
    #[derivative(Debug = "ignore")]
    pub delete_receiver: Option<Receiver<Notice>>,
    #[derivative(Debug = "ignore")]
    pub cdn_receiver: Option<Receiver<Notice>>,
    #[derivative(Debug = "ignore")]
    pub cookie_receiver: Option<Receiver<Notice>>,
    #[derivative(Debug = "ignore")]
    pub cdn_status_receiver: Option<Receiver<Result<CdnStatus, String>>>,
}

impl AppState {
    /// Progress bar fill in [0, 1].
    pub fn progress_fraction(&self) -> f32 {
        match &self.phase {
            UploadPhase::Idle => 0.0,
            UploadPhase::InProgress { percent } => (percent / 100.0).clamp(0.0, 1.0),
            UploadPhase::Terminal(UploadOutcome::Success { .. }) => 1.0,
            UploadPhase::Terminal(UploadOutcome::Failure { .. }) => 0.0,
        }
    }

    /// True while any server call is in flight.
    pub fn busy(&self) -> bool {
        self.is_uploading || self.is_deleting || self.videos_loading || self.is_cdn_uploading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fraction_tracks_the_phase() {
        let mut state = AppState::default();
        assert_eq!(state.progress_fraction(), 0.0);

        state.phase = UploadPhase::InProgress { percent: 50.0 };
        assert_eq!(state.progress_fraction(), 0.5);

        state.phase = UploadPhase::Terminal(UploadOutcome::Success {
            video_id: "a".into(),
            playlist_url: None,
        });
        assert_eq!(state.progress_fraction(), 1.0);
    }

    #[test]
    fn progress_fraction_is_clamped() {
        let state = AppState {
            phase: UploadPhase::InProgress { percent: 140.0 },
            ..Default::default()
        };
        assert_eq!(state.progress_fraction(), 1.0);
    }
}
