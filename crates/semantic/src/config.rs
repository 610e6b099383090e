use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::SemanticError;

/// Which [`EmbeddingProvider`](crate::EmbeddingProvider) implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Hugging Face feature-extraction inference API.
    #[default]
    HuggingFace,
    /// Offline deterministic vectors, see [`StubProvider::hashed`](crate::StubProvider::hashed).
    Stub,
}

/// Deployment-time configuration for the embedding provider.
///
/// # Example
/// ```
/// use semantic::ProviderConfig;
///
/// let cfg = ProviderConfig {
///     hf_token: Some("hf_xxx".into()),
///     ..Default::default()
/// };
/// assert_eq!(
///     cfg.endpoint_url(),
///     "https://api-inference.huggingface.co/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2"
/// );
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Provider implementation selector.
    #[serde(default)]
    pub kind: ProviderKind,
    /// Model identifier appended to [`api_base`](Self::api_base).
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Feature-extraction pipeline base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bearer token sent as `Authorization: Bearer <token>`.
    #[serde(default)]
    pub hf_token: Option<String>,
    /// Ask the provider to block until a cold model is loaded instead of answering 503.
    #[serde(default = "default_true")]
    pub wait_for_model: bool,
    /// Client-side request timeout. `None` keeps the HTTP client's default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Vector length produced by the stub provider.
    #[serde(default = "default_stub_dim")]
    pub stub_dim: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model_id: default_model_id(),
            api_base: default_api_base(),
            hf_token: None,
            wait_for_model: true,
            timeout_secs: None,
            stub_dim: default_stub_dim(),
        }
    }
}

// Hand-written so the bearer token never lands in logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("model_id", &self.model_id)
            .field("api_base", &self.api_base)
            .field("hf_token", &self.hf_token.as_ref().map(|_| "<redacted>"))
            .field("wait_for_model", &self.wait_for_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("stub_dim", &self.stub_dim)
            .finish()
    }
}

impl ProviderConfig {
    /// Full URL of the model's feature-extraction endpoint.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            self.model_id.trim_start_matches('/')
        )
    }

    /// `Authorization` header value, if a non-empty token is configured.
    pub fn auth_header(&self) -> Option<String> {
        self.hf_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| format!("Bearer {token}"))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Reject settings that can never produce a working provider.
    pub fn validate(&self) -> Result<(), SemanticError> {
        if self.model_id.trim().is_empty() {
            return Err(SemanticError::InvalidConfig(
                "model_id must not be empty".into(),
            ));
        }
        match self.kind {
            ProviderKind::HuggingFace => {
                if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://"))
                {
                    return Err(SemanticError::InvalidConfig(format!(
                        "api_base must be an http(s) URL, got '{}'",
                        self.api_base
                    )));
                }
                if self.timeout_secs == Some(0) {
                    return Err(SemanticError::InvalidConfig(
                        "timeout_secs must be greater than zero".into(),
                    ));
                }
            }
            ProviderKind::Stub => {
                if self.stub_dim == 0 {
                    return Err(SemanticError::InvalidConfig(
                        "stub_dim must be greater than zero".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn default_model_id() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

fn default_api_base() -> String {
    "https://api-inference.huggingface.co/pipeline/feature-extraction".to_string()
}

fn default_true() -> bool {
    true
}

fn default_stub_dim() -> usize {
    384
}
