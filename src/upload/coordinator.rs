use crate::api::types::UploadResponse;
use crate::api::ApiError;
use crate::upload::types::{ProgressEvent, UploadEvent, UploadOutcome, UploadRequest};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::sync::mpsc::Sender;
use tokio_util::io::ReaderStream;

const CHUNK_SIZE: usize = 64 * 1024;

/// Drives a single file upload to `POST /upload`.
///
/// The file is streamed as a multipart part; every chunk handed to the
/// transport bumps a byte counter and emits a progress event, so percentages
/// are non-decreasing and reach 100 exactly when the whole file has been
/// written out. One invocation issues exactly one request and never retries.
pub struct UploadCoordinator {
    client: reqwest::Client,
    base_url: String,
}

impl UploadCoordinator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            // No overall timeout; upload duration is bounded only by the
            // transport.
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Runs one upload to completion. Emits zero or more progress events on
    /// `events`, then exactly one `UploadEvent::Finished` carrying the
    /// terminal outcome (also returned).
    pub async fn upload(
        &self,
        request: UploadRequest,
        events: Sender<UploadEvent>,
    ) -> UploadOutcome {
        let outcome = self.run(&request, &events).await;
        let _ = events.send(UploadEvent::Finished(outcome.clone()));
        outcome
    }

    async fn run(&self, request: &UploadRequest, events: &Sender<UploadEvent>) -> UploadOutcome {
        let file = match tokio::fs::File::open(&request.file_path).await {
            Ok(file) => file,
            Err(e) => {
                return UploadOutcome::Failure {
                    message: format!("failed to open {}: {}", request.file_path.display(), e),
                }
            }
        };

        let total = match file.metadata().await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                return UploadOutcome::Failure {
                    message: format!("failed to read {}: {}", request.file_path.display(), e),
                }
            }
        };

        match self.send(request, file, total, events.clone()).await {
            Ok(response) => {
                // The stream never reports past `total`, so this final event
                // stays non-decreasing and covers zero-length files too.
                let _ = events.send(UploadEvent::Progress(ProgressEvent { percent: 100.0 }));
                UploadOutcome::Success {
                    video_id: response.video_id,
                    playlist_url: response.playlist_url,
                }
            }
            Err(e) => UploadOutcome::Failure {
                message: e.to_string(),
            },
        }
    }

    async fn send(
        &self,
        request: &UploadRequest,
        file: tokio::fs::File,
        total: u64,
        events: Sender<UploadEvent>,
    ) -> Result<UploadResponse, ApiError> {
        let file_name = request
            .file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4")
            .to_string();
        let mime = mime_guess::from_path(&request.file_path).first_or_octet_stream();

        let body = reqwest::Body::wrap_stream(progress_stream(file, total, events));
        let part = reqwest::multipart::Part::stream_with_length(body, total)
            .file_name(file_name)
            .mime_str(mime.essence_str())?;
        let form = reqwest::multipart::Form::new()
            .part("video", part)
            .text("injection_ratio", request.injection_ratio.to_string());

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        Ok(response.json().await?)
    }
}

/// Chunked file stream that reports cumulative bytes as percentages.
///
/// The denominator is the file length, so multipart framing does not skew
/// the numbers and the last file chunk lands exactly on 100.
fn progress_stream(
    file: tokio::fs::File,
    total: u64,
    events: Sender<UploadEvent>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
    let mut sent: u64 = 0;
    ReaderStream::with_capacity(file, CHUNK_SIZE).map(move |chunk| {
        if let Ok(bytes) = &chunk {
            sent += bytes.len() as u64;
            let percent = if total == 0 {
                100.0
            } else {
                (sent as f64 * 100.0 / total as f64).min(100.0) as f32
            };
            let _ = events.send(UploadEvent::Progress(ProgressEvent { percent }));
        }
        chunk
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::mpsc::{channel, Receiver};

    fn temp_video(len: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".mp4")
            .tempfile()
            .unwrap();
        file.write_all(&vec![0x42u8; len]).unwrap();
        file.flush().unwrap();
        file
    }

    fn request_for(file: &tempfile::NamedTempFile) -> UploadRequest {
        UploadRequest {
            file_path: file.path().to_path_buf(),
            injection_ratio: 0.5,
        }
    }

    /// Drains the event channel, asserting progress is non-decreasing, stays
    /// in [0, 100], and stops after the terminal event. Returns the last
    /// progress value seen.
    fn check_events(rx: Receiver<UploadEvent>) -> f32 {
        let mut last = 0.0f32;
        let mut finished = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                UploadEvent::Progress(p) => {
                    assert!(!finished, "progress after terminal outcome");
                    assert!(p.percent >= last, "progress went backwards");
                    assert!(p.percent <= 100.0);
                    last = p.percent;
                }
                UploadEvent::Finished(_) => finished = true,
            }
        }
        assert!(finished, "no terminal event emitted");
        last
    }

    #[tokio::test]
    async fn successful_upload_reaches_100_with_monotone_progress() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"video_id":"abc123","status":"ready",
                    "playlist_url":"/playlist/abc123","segments":4,"injection_ratio":0.5}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let file = temp_video(256 * 1024 + 11);
        let coordinator = UploadCoordinator::new(server.url());
        let (tx, rx) = channel();

        let outcome = coordinator.upload(request_for(&file), tx).await;

        // Exactly one request, no implicit retries.
        mock.assert_async().await;

        match outcome {
            UploadOutcome::Success {
                video_id,
                playlist_url,
            } => {
                assert_eq!(video_id, "abc123");
                assert_eq!(playlist_url.as_deref(), Some("/playlist/abc123"));
            }
            UploadOutcome::Failure { message } => panic!("unexpected failure: {}", message),
        }

        assert_eq!(check_events(rx), 100.0);
    }

    #[tokio::test]
    async fn empty_file_still_finishes_at_100() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/upload")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"video_id":"empty1"}"#)
            .create_async()
            .await;

        let file = temp_video(0);
        let coordinator = UploadCoordinator::new(server.url());
        let (tx, rx) = channel();

        let outcome = coordinator.upload(request_for(&file), tx).await;

        assert!(matches!(outcome, UploadOutcome::Success { .. }));
        assert_eq!(check_events(rx), 100.0);
    }

    #[tokio::test]
    async fn rejected_upload_carries_server_detail_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload")
            .with_status(413)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"file too large"}"#)
            .expect(1)
            .create_async()
            .await;

        let file = temp_video(1024);
        let coordinator = UploadCoordinator::new(server.url());
        let (tx, rx) = channel();

        let outcome = coordinator.upload(request_for(&file), tx).await;

        mock.assert_async().await;
        match outcome {
            UploadOutcome::Failure { message } => assert_eq!(message, "file too large"),
            UploadOutcome::Success { .. } => panic!("413 must not be a success"),
        }

        // Terminal event still fires; progress never exceeds 100.
        check_events(rx);
    }

    #[tokio::test]
    async fn unexpected_error_body_falls_back_to_status_line() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/upload")
            .with_status(500)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let file = temp_video(16);
        let coordinator = UploadCoordinator::new(server.url());
        let (tx, _rx) = channel();

        match coordinator.upload(request_for(&file), tx).await {
            UploadOutcome::Failure { message } => assert!(message.contains("500")),
            UploadOutcome::Success { .. } => panic!("500 must not be a success"),
        }
    }

    #[tokio::test]
    async fn network_failure_is_a_terminal_failure_not_silence() {
        // Nothing listens on this port.
        let coordinator = UploadCoordinator::new("http://127.0.0.1:1");
        let file = temp_video(64);
        let (tx, rx) = channel();

        let outcome = coordinator.upload(request_for(&file), tx).await;

        match outcome {
            UploadOutcome::Failure { message } => assert!(!message.is_empty()),
            UploadOutcome::Success { .. } => panic!("transport failure must not be a success"),
        }

        // The terminal event is still delivered to the UI channel.
        let finished = std::iter::from_fn(|| rx.try_recv().ok())
            .any(|event| matches!(event, UploadEvent::Finished(_)));
        assert!(finished);
    }

    #[tokio::test]
    async fn missing_file_fails_without_issuing_a_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload")
            .expect(0)
            .create_async()
            .await;

        let coordinator = UploadCoordinator::new(server.url());
        let (tx, _rx) = channel();
        let request = UploadRequest {
            file_path: std::path::PathBuf::from("/nonexistent/clip.mp4"),
            injection_ratio: 0.5,
        };

        let outcome = coordinator.upload(request, tx).await;

        mock.assert_async().await;
        assert!(matches!(outcome, UploadOutcome::Failure { .. }));
    }
}
