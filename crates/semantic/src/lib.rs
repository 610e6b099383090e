//! Embedding providers for the custom embedding service
//!
//! Everything that talks to (or pretends to be) an embedding model lives here,
//! behind the [`EmbeddingProvider`] trait. The enrichment loop only ever sees
//! the trait, so swapping the remote API for a stub is a config change.
//!
//! Two implementations ship:
//!
//! - **Hugging Face** - `POST`s `{"inputs": text, "options": {"wait_for_model": true}}`
//!   to a feature-extraction pipeline URL with a bearer token.
//! - **Stub** - fixed, failing, or hash-seeded vectors. Tests use it, and so can
//!   offline deployments.
//!
//! Provider responses are passed through verbatim as [`Embedding`]; only the
//! outer shape is checked.
//!
//! ## Quick example
//!
//! ```no_run
//! use semantic::{build_provider, ProviderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), semantic::SemanticError> {
//!     let cfg = ProviderConfig {
//!         hf_token: Some("hf_xxx".into()),
//!         ..Default::default()
//!     };
//!     let provider = build_provider(&cfg)?;
//!     let embedding = provider.embed("This is a test.").await?;
//!     println!("{:?}", embedding.shape());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod types;

mod api;
mod stub;

use std::sync::Arc;

use async_trait::async_trait;

pub use crate::api::HuggingFaceProvider;
pub use crate::config::{ProviderConfig, ProviderKind};
pub use crate::error::SemanticError;
pub use crate::stub::StubProvider;
pub use crate::types::Embedding;

/// Turns text into an [`Embedding`].
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text. One upstream attempt, no retries.
    async fn embed(&self, text: &str) -> Result<Embedding, SemanticError>;

    /// Short provider label for logs and health output.
    fn name(&self) -> &str;

    /// Model identifier served by this provider.
    fn model(&self) -> &str;
}

/// Build the provider selected by [`ProviderConfig::kind`].
pub fn build_provider(cfg: &ProviderConfig) -> Result<Arc<dyn EmbeddingProvider>, SemanticError> {
    cfg.validate()?;
    let provider: Arc<dyn EmbeddingProvider> = match cfg.kind {
        ProviderKind::HuggingFace => Arc::new(HuggingFaceProvider::new(cfg)?),
        ProviderKind::Stub => {
            Arc::new(StubProvider::hashed(cfg.stub_dim).with_model(cfg.model_id.clone()))
        }
    };
    tracing::info!(
        provider = provider.name(),
        model = provider.model(),
        "embedding provider ready"
    );
    Ok(provider)
}
