use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::{AnalysisRequest, FailureKind, SubmitError};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` leaves the request deadline to the transport.
    pub request_timeout: Option<Duration>,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_response_bytes: 5 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Sends one request, without retrying, and returns the decoded JSON body.
    async fn submit(&self, request: &AnalysisRequest) -> Result<serde_json::Value, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAnalysisClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestAnalysisClient {
    pub fn new(settings: ClientSettings) -> Result<Self, SubmitError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, SubmitError> {
        let base = self.settings.base_url.trim_end_matches('/');
        let joined = format!("{base}/{}", path.trim_start_matches('/'));
        reqwest::Url::parse(&joined)
            .map_err(|err| SubmitError::new(FailureKind::InvalidUrl, format!("{joined}: {err}")))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, SubmitError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(SubmitError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(SubmitError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl AnalysisClient for ReqwestAnalysisClient {
    async fn submit(&self, request: &AnalysisRequest) -> Result<serde_json::Value, SubmitError> {
        let url = self.endpoint(&request.path)?;
        let body = serde_json::to_vec(&request.body)
            .map_err(|err| SubmitError::new(FailureKind::Decode, err.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = self.read_body(response).await?;

        if !status.is_success() {
            let detail = error_detail(&bytes).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                detail,
            ));
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| SubmitError::new(FailureKind::Decode, err.to_string()))
    }
}

/// Error bodies from the service carry `{"detail": ..}` or `{"error": ..}`.
fn error_detail(bytes: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    ["detail", "error"]
        .into_iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(ToOwned::to_owned)
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(FailureKind::Timeout, err.to_string());
    }
    SubmitError::new(FailureKind::Network, err.to_string())
}
