mod state;
mod ui;

pub use state::{AppState, Notice, UploadPhase};

use crate::api::ApiClient;
use crate::upload::{UploadCoordinator, UploadEvent, UploadOutcome, UploadRequest};
use crate::utils::cookie_store::CookieStore;
use eframe::{egui, App};
use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc;

/// Per-session application controller. Owns the transient UI state and
/// spawns one worker thread per user action; workers report back over mpsc
/// channels that `update_state` drains every frame.
pub struct VideoCdnUploader {
    server_url: String,
    selected_file: Option<PathBuf>,
    selected_file_size: Option<u64>,
    injection_ratio: f32,
    fake_image_count: u32,
    cookie_text: String,
    /// Cookie string awaiting server confirmation before it is persisted.
    pending_cookie_save: Option<String>,
    cookie_store: CookieStore,
    state: AppState,
}

impl VideoCdnUploader {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut app = Self {
            server_url: ApiClient::server_url_from_env(),
            selected_file: None,
            selected_file_size: None,
            injection_ratio: 0.5,
            fake_image_count: 10,
            cookie_text: String::new(),
            pending_cookie_save: None,
            cookie_store: CookieStore::new(&base_dir),
            state: AppState::default(),
        };

        tracing::info!(server = %app.server_url, "starting video cdn uploader");

        // A cookie string saved in a previous session is pushed back to the
        // server on startup.
        if let Some(cookies) = app.cookie_store.load() {
            app.cookie_text = cookies.clone();
            app.push_cookies_quietly(cookies);
        }

        app.refresh_videos();
        app.fetch_cdn_status();
        app
    }

    /// Runs a future on a dedicated worker thread with its own runtime.
    fn spawn<F>(future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        std::thread::spawn(move || match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(future),
            Err(e) => tracing::error!("failed to start worker runtime: {}", e),
        });
    }

    fn api_client(&self) -> ApiClient {
        ApiClient::new(self.server_url.clone())
    }

    pub(crate) fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), path)
    }

    pub(crate) fn start_upload(&mut self) {
        let Some(file_path) = self.selected_file.clone() else {
            self.state.upload_notice = Some(Notice::error("No video file selected"));
            return;
        };

        self.state.is_uploading = true;
        self.state.upload_notice = None;
        self.state.phase = UploadPhase::InProgress { percent: 0.0 };

        let (sender, receiver) = mpsc::channel();
        self.state.upload_receiver = Some(receiver);

        let coordinator = UploadCoordinator::new(self.server_url.clone());
        let request = UploadRequest {
            file_path,
            injection_ratio: self.injection_ratio,
        };
        tracing::info!(file = %request.file_path.display(), "starting upload");

        Self::spawn(async move {
            coordinator.upload(request, sender).await;
        });
    }

    pub(crate) fn refresh_videos(&mut self) {
        self.state.videos_loading = true;
        self.state.videos_notice = None;
        self.state.pending_delete = None;

        let (sender, receiver) = mpsc::channel();
        self.state.videos_receiver = Some(receiver);

        let client = self.api_client();
        Self::spawn(async move {
            let result = client.videos().await.map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
    }

    pub(crate) fn delete_video(&mut self, video_id: String) {
        self.state.is_deleting = true;
        self.state.videos_notice = None;
        self.state.pending_delete = None;
        tracing::info!(%video_id, "deleting video");

        let (sender, receiver) = mpsc::channel();
        self.state.delete_receiver = Some(receiver);

        let client = self.api_client();
        Self::spawn(async move {
            let notice = match client.delete_video(&video_id).await {
                Ok(response) => Notice::ok(response.message),
                Err(e) => Notice::error(format!("Failed to delete video: {}", e)),
            };
            let _ = sender.send(notice);
        });
    }

    pub(crate) fn play_video(&self, playlist_url: &str) {
        let url = self.absolute_url(playlist_url);
        if let Err(e) = open::that(&url) {
            tracing::error!("failed to open {}: {}", url, e);
        }
    }

    pub(crate) fn upload_fake_images(&mut self) {
        self.state.is_cdn_uploading = true;
        self.state.cdn_notice = None;
        let count = self.fake_image_count;

        let (sender, receiver) = mpsc::channel();
        self.state.cdn_receiver = Some(receiver);

        let client = self.api_client();
        Self::spawn(async move {
            let notice = match client.upload_fake_images(count).await {
                Ok(response) => Notice::ok(format!(
                    "Uploaded {}/{} fake images",
                    response.uploaded, response.total_requested
                )),
                Err(e) => Notice::error(format!("CDN upload failed: {}", e)),
            };
            let _ = sender.send(notice);
        });
    }

    pub(crate) fn save_cookies(&mut self) {
        let cookies = self.cookie_text.trim().to_string();
        self.state.cookie_notice = None;
        self.pending_cookie_save = Some(cookies.clone());

        let (sender, receiver) = mpsc::channel();
        self.state.cookie_receiver = Some(receiver);

        let client = self.api_client();
        Self::spawn(async move {
            let notice = match client.update_cdn_cookies(&cookies).await {
                Ok(_) if cookies.is_empty() => Notice::ok("Cookies cleared"),
                Ok(_) => Notice::ok("Cookies saved successfully"),
                Err(e) => Notice::error(format!("Failed to update cookies: {}", e)),
            };
            let _ = sender.send(notice);
        });
    }

    fn push_cookies_quietly(&self, cookies: String) {
        let client = self.api_client();
        Self::spawn(async move {
            if let Err(e) = client.update_cdn_cookies(&cookies).await {
                tracing::warn!("could not restore CDN cookies on the server: {}", e);
            }
        });
    }

    pub(crate) fn fetch_cdn_status(&mut self) {
        let (sender, receiver) = mpsc::channel();
        self.state.cdn_status_receiver = Some(receiver);

        let client = self.api_client();
        Self::spawn(async move {
            let result = client.cdn_status().await.map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        self.drain_upload_events();
        self.drain_videos_result();
        self.drain_delete_notice();
        self.drain_cdn_notice();
        self.drain_cookie_notice();
        self.drain_cdn_status();

        if self.state.busy() {
            ctx.request_repaint();
        }
    }

    fn drain_upload_events(&mut self) {
        let mut events = Vec::new();
        if let Some(receiver) = &self.state.upload_receiver {
            while let Ok(event) = receiver.try_recv() {
                events.push(event);
            }
        }

        for event in events {
            match event {
                UploadEvent::Progress(progress) => {
                    if let UploadPhase::InProgress { percent } = &mut self.state.phase {
                        *percent = progress.percent;
                    }
                }
                UploadEvent::Finished(outcome) => {
                    self.state.is_uploading = false;
                    self.state.upload_receiver = None;
                    match &outcome {
                        UploadOutcome::Success { video_id, .. } => {
                            tracing::info!(%video_id, "upload finished");
                            self.state.upload_notice = Some(Notice::ok(format!(
                                "Video uploaded successfully! ID: {}",
                                video_id
                            )));
                            self.selected_file = None;
                            self.selected_file_size = None;
                            self.refresh_videos();
                        }
                        UploadOutcome::Failure { message } => {
                            tracing::warn!("upload failed: {}", message);
                            self.state.upload_notice =
                                Some(Notice::error(format!("Upload failed: {}", message)));
                        }
                    }
                    self.state.phase = UploadPhase::Terminal(outcome);
                }
            }
        }
    }

    fn drain_videos_result(&mut self) {
        let mut received = None;
        if let Some(receiver) = &self.state.videos_receiver {
            if let Ok(result) = receiver.try_recv() {
                received = Some(result);
            }
        }

        if let Some(result) = received {
            self.state.videos_receiver = None;
            self.state.videos_loading = false;
            match result {
                Ok(videos) => {
                    self.state.videos = videos;
                    self.state.videos_error = None;
                }
                Err(e) => {
                    // Degrades to a visible placeholder instead of surfacing
                    // the raw error.
                    tracing::error!("failed to load videos: {}", e);
                    self.state.videos.clear();
                    self.state.videos_error = Some("Failed to load videos".to_string());
                }
            }
        }
    }

    fn drain_delete_notice(&mut self) {
        let mut received = None;
        if let Some(receiver) = &self.state.delete_receiver {
            if let Ok(notice) = receiver.try_recv() {
                received = Some(notice);
            }
        }

        if let Some(notice) = received {
            self.state.delete_receiver = None;
            self.state.is_deleting = false;
            let succeeded = notice.success;
            self.state.videos_notice = Some(notice);
            if succeeded {
                self.refresh_videos();
            }
        }
    }

    fn drain_cdn_notice(&mut self) {
        let mut received = None;
        if let Some(receiver) = &self.state.cdn_receiver {
            if let Ok(notice) = receiver.try_recv() {
                received = Some(notice);
            }
        }

        if let Some(notice) = received {
            self.state.cdn_receiver = None;
            self.state.is_cdn_uploading = false;
            let succeeded = notice.success;
            self.state.cdn_notice = Some(notice);
            if succeeded {
                self.fetch_cdn_status();
            }
        }
    }

    fn drain_cookie_notice(&mut self) {
        let mut received = None;
        if let Some(receiver) = &self.state.cookie_receiver {
            if let Ok(notice) = receiver.try_recv() {
                received = Some(notice);
            }
        }

        if let Some(notice) = received {
            self.state.cookie_receiver = None;
            if notice.success {
                // Persist only once the server has accepted the update.
                if let Some(cookies) = self.pending_cookie_save.take() {
                    if let Err(e) = self.cookie_store.save(&cookies) {
                        tracing::warn!("could not persist cookies locally: {}", e);
                    }
                }
                self.fetch_cdn_status();
            } else {
                self.pending_cookie_save = None;
            }
            self.state.cookie_notice = Some(notice);
        }
    }

    fn drain_cdn_status(&mut self) {
        let mut received = None;
        if let Some(receiver) = &self.state.cdn_status_receiver {
            if let Ok(result) = receiver.try_recv() {
                received = Some(result);
            }
        }

        if let Some(result) = received {
            self.state.cdn_status_receiver = None;
            if let Err(e) = &result {
                tracing::warn!("failed to load CDN status: {}", e);
            }
            self.state.cdn_status = Some(result);
        }
    }
}

impl App for VideoCdnUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
