use thiserror::Error;

/// Errors surfaced by an [`EmbeddingProvider`](crate::EmbeddingProvider).
#[derive(Debug, Error)]
pub enum SemanticError {
    /// Configuration is inconsistent (e.g., empty model id or a non-HTTP base URL).
    #[error("invalid provider config: {0}")]
    InvalidConfig(String),
    /// The request never produced an HTTP response (connect failure, timeout, TLS).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The provider answered with a non-success status code.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The provider answered 2xx but the body is not a usable embedding.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
    /// Failure injected by the stub provider.
    #[error("stub provider failure: {0}")]
    Stub(String),
}

impl SemanticError {
    /// Whether the failure happened before the provider produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, SemanticError::Http(_))
    }
}
