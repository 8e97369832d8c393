//! HTTP client for the diff service.

use crate::model::{DiffRequest, DiffResponse, ErrorBody};
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

/// Default service address, matching the port the diff service listens on.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5001";

/// Message shown when a failed response carries no usable `error` field.
pub const FALLBACK_ERROR: &str = "Failed to generate diff";

#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport level failure: connection refused, timeout, TLS.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Invalid response from diff service: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Message suitable for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Anything able to answer a diff request.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DiffSource {
    async fn generate_diff(&self, request: &DiffRequest) -> Result<DiffResponse, FetchError>;
}

/// [`DiffSource`] backed by `POST {endpoint}/generate-diff`.
#[derive(Clone)]
pub struct HttpDiffSource {
    endpoint: String,
    http: Client,
}

impl HttpDiffSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), http: Client::new() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self) -> String {
        format!("{}/generate-diff", self.endpoint.trim_end_matches('/'))
    }
}

/// Extracts the user-facing message from a failure body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR.to_string())
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DiffSource for HttpDiffSource {
    async fn generate_diff(&self, request: &DiffRequest) -> Result<DiffResponse, FetchError> {
        let url = self.url();
        debug!(%url, target = %request.url, timestamp = %request.timestamp, "requesting diff");

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), %message, "diff service returned an error");
            return Err(FetchError::Server { status: status.as_u16(), message });
        }

        let parsed: DiffResponse = serde_json::from_str(&body)?;
        debug!(entries = parsed.diff_data.len(), bytes = body.len(), "diff received");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request() -> DiffRequest {
        DiffRequest { url: "https://example.com".into(), timestamp: "20250101".into() }
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"error": "URL is required"}"#), "URL is required");
        assert_eq!(error_message(r#"{"error": ""}"#), FALLBACK_ERROR);
        assert_eq!(error_message(r#"{"detail": "x"}"#), FALLBACK_ERROR);
        assert_eq!(error_message("<html>502 Bad Gateway</html>"), FALLBACK_ERROR);
    }

    #[tokio::test]
    async fn test_successful_request_round_trip() {
        let router = Router::new().route(
            "/generate-diff",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "url": body["url"],
                    "archived_date": "01-01-2025",
                    "current_date": "10-16-2026",
                    "diff_data": [
                        {"type": "add", "line_num": 1, "old_text": "", "new_text": body["timestamp"]}
                    ],
                    "significant_added": [],
                    "significant_removed": [],
                    "stats": {"added_lines": 1, "removed_lines": 0, "changed_lines": 0, "is_identical": false}
                }))
            }),
        );
        let endpoint = spawn_stub(router).await;
        let source = HttpDiffSource::new(format!("{}/", endpoint));

        let response = source.generate_diff(&request()).await.unwrap();
        assert_eq!(response.url, "https://example.com");
        assert_eq!(response.diff_data[0].new_text(), "20250101");
        assert_eq!(response.stats.added_lines, 1);
    }

    #[tokio::test]
    async fn test_server_error_body_is_surfaced() {
        let router = Router::new().route(
            "/generate-diff",
            post(|| async {
                (StatusCode::BAD_REQUEST, Json(json!({"error": "Failed to fetch archived content"})))
            }),
        );
        let source = HttpDiffSource::new(spawn_stub(router).await);

        let err = source.generate_diff(&request()).await.unwrap_err();
        assert!(matches!(err, FetchError::Server { status: 400, .. }));
        assert_eq!(err.user_message(), "Failed to fetch archived content");
    }

    #[tokio::test]
    async fn test_server_error_without_body_uses_fallback() {
        let router = Router::new().route(
            "/generate-diff",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let source = HttpDiffSource::new(spawn_stub(router).await);

        let err = source.generate_diff(&request()).await.unwrap_err();
        assert_eq!(err.user_message(), FALLBACK_ERROR);
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let router = Router::new().route("/generate-diff", post(|| async { "not json" }));
        let source = HttpDiffSource::new(spawn_stub(router).await);

        let err = source.generate_diff(&request()).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpDiffSource::new(format!("http://{}", addr));
        let err = source.generate_diff(&request()).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }
}
