use serde::Deserialize;
use thiserror::Error;

/// Error shape the server uses for every non-success response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Failure of a single server call. Terminal in both cases, never retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable response reached the client.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status and a human-readable
    /// detail message.
    #[error("{detail}")]
    Api { status: u16, detail: String },
}

impl ApiError {
    /// Builds the application-error variant from a non-success response.
    ///
    /// The server's JSON `detail` field is carried verbatim; when the body
    /// has some other shape the HTTP status line stands in for it.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let fallback = format!("server returned {}", status);
        let detail = match response.text().await {
            Ok(body) => serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.detail)
                .unwrap_or(fallback),
            Err(_) => fallback,
        };

        ApiError::Api {
            status: status.as_u16(),
            detail,
        }
    }
}
