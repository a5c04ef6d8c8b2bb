use crate::api::error::ApiError;
use crate::api::types::{
    CdnStatus, CookieUpdateResponse, DeleteResponse, FakeImageUploadResponse, VideoEntry,
    VideoListResponse,
};
use reqwest::multipart::Form;
use serde::de::DeserializeOwned;

/// Default server location, matching the demo server's port.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Typed client for everything the UI consumes besides the video upload
/// itself: listing, deletion, and the fake-image/cookie CDN endpoints.
///
/// One `reqwest::Client` is built per `ApiClient` and reused across calls.
/// The upload path lives in `upload::UploadCoordinator` because it needs a
/// streaming request body.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Server base URL from `VIDEO_SERVER_URL`, falling back to localhost.
    pub fn server_url_from_env() -> String {
        std::env::var("VIDEO_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string())
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /videos`.
    pub async fn videos(&self) -> Result<Vec<VideoEntry>, ApiError> {
        let list: VideoListResponse = self.get_json("/videos").await?;
        Ok(list.videos)
    }

    /// `DELETE /video/{id}`.
    pub async fn delete_video(&self, video_id: &str) -> Result<DeleteResponse, ApiError> {
        let url = self.build_url(&format!("/video/{}", video_id));
        let response = self.client.delete(&url).send().await?;
        Self::parse(response).await
    }

    /// `POST /upload-fake-images` with the requested image count.
    pub async fn upload_fake_images(
        &self,
        count: u32,
    ) -> Result<FakeImageUploadResponse, ApiError> {
        let form = Form::new().text("count", count.to_string());
        self.post_form("/upload-fake-images", form).await
    }

    /// `POST /update-cdn-cookies`. An empty string clears the server-side
    /// session cookies.
    pub async fn update_cdn_cookies(
        &self,
        cookies: &str,
    ) -> Result<CookieUpdateResponse, ApiError> {
        let form = Form::new().text("cookies", cookies.to_string());
        self.post_form("/update-cdn-cookies", form).await
    }

    /// `GET /cdn-status`.
    pub async fn cdn_status(&self) -> Result<CdnStatus, ApiError> {
        self.get_json("/cdn-status").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.build_url(path)).send().await?;
        Self::parse(response).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.build_url(path))
            .multipart(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response.json().await?)
    }
}
