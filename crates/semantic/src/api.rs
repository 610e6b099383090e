use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{Embedding, EmbeddingProvider, ProviderConfig, SemanticError};

/// Client for the Hugging Face feature-extraction inference API.
///
/// One request per [`embed`](EmbeddingProvider::embed) call, no retries. The
/// underlying `reqwest::Client` is built once and pools connections.
#[derive(Debug, Clone)]
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    url: String,
    model_id: String,
    auth_header: Option<String>,
    wait_for_model: bool,
}

impl HuggingFaceProvider {
    pub fn new(cfg: &ProviderConfig) -> Result<Self, SemanticError> {
        cfg.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = cfg.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            url: cfg.endpoint_url(),
            model_id: cfg.model_id.clone(),
            auth_header: cfg.auth_header(),
            wait_for_model: cfg.wait_for_model,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceProvider {
    async fn embed(&self, text: &str) -> Result<Embedding, SemanticError> {
        let payload = build_payload(text, self.wait_for_model);

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header(reqwest::header::AUTHORIZATION, header);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SemanticError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value = response
            .json::<Value>()
            .await
            .map_err(|e| SemanticError::InvalidResponse(format!("body is not JSON: {e}")))?;

        let embedding = Embedding::from_value(value)?;
        tracing::debug!(
            model = %self.model_id,
            shape = ?embedding.shape(),
            "embedding received"
        );
        Ok(embedding)
    }

    fn name(&self) -> &str {
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.model_id
    }
}

fn build_payload(text: &str, wait_for_model: bool) -> Value {
    json!({
        "inputs": text,
        "options": { "wait_for_model": wait_for_model }
    })
}
