//! Client side of the remote config service.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::schema::{CanonicalConfig, Vendor};

use super::{PipelineResult, PushPayload, PushResult};

const GENERATE_PATH: &str = "/tools/config/generate";
const PUSH_PATH: &str = "/tools/config/push";

/// Why a remote call produced no usable result.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote service is not configured")]
    NotConfigured,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Remote render/lint and push endpoints.
#[async_trait]
pub trait RemoteConfigService: Send + Sync {
    async fn generate(&self, config: &CanonicalConfig, vendor: Vendor) -> Result<PipelineResult, RemoteError>;

    async fn push(&self, payload: &PushPayload) -> Result<PushResult, RemoteError>;
}

/// JSON-over-HTTP remote with optional bearer auth.
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize + Sync + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "remote call");
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    vendor: Vendor,
    config: &'a CanonicalConfig,
}

#[async_trait]
impl RemoteConfigService for HttpRemote {
    async fn generate(&self, config: &CanonicalConfig, vendor: Vendor) -> Result<PipelineResult, RemoteError> {
        self.post(GENERATE_PATH, &GenerateRequest { vendor, config }).await
    }

    async fn push(&self, payload: &PushPayload) -> Result<PushResult, RemoteError> {
        self.post(PUSH_PATH, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpRemote, RemoteError};

    #[test]
    fn joins_paths_without_double_slash() {
        let remote = HttpRemote::new("https://netops.example/api/", None);
        assert_eq!(remote.url("/tools/config/push"), "https://netops.example/api/tools/config/push");
    }

    #[test]
    fn status_error_mentions_code() {
        let err = RemoteError::Status {
            status: 503,
            body: "maintenance".into(),
        };
        assert_eq!(err.to_string(), "remote returned HTTP 503: maintenance");
    }
}
