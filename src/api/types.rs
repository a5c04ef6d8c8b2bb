//! Response shapes of the demo server. The client conforms to these; it does
//! not define them.

use serde::Deserialize;

/// One entry of `GET /videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoEntry {
    pub video_id: String,
    pub playlist_url: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    pub videos: Vec<VideoEntry>,
}

/// Success body of `POST /upload`. Only `video_id` is required; the server
/// also reports where the playlist landed.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub video_id: String,
    #[serde(default)]
    pub playlist_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    #[serde(default)]
    pub deleted: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FakeImageUploadResponse {
    pub uploaded: usize,
    pub total_requested: usize,
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CookieUpdateResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub cookies_set: bool,
    #[serde(default)]
    pub cookies_length: usize,
}

/// Body of `GET /cdn-status`. `cookies_source` is either "dynamic" or
/// "config" depending on where the server got its session cookies.
#[derive(Debug, Clone, Deserialize)]
pub struct CdnStatus {
    pub cdn_configured: bool,
    pub cookies_source: String,
    pub cookies_length: usize,
}

