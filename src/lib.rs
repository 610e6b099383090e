//! Batch embedding enrichment.
//!
//! Takes a search-skill style batch (`{"values": [{"recordId", "data": {"question"}}]}`),
//! embeds each record's question through an [`EmbeddingProvider`], and returns
//! a batch of the same length and order with either vectors or an error per
//! record. A provider failure never fails the batch; only an unparseable
//! request does.
//!
//! ```no_run
//! use enrichment::{enrich_batch, parse_request, EnrichmentConfig};
//! use semantic::{build_provider, ProviderConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = build_provider(&ProviderConfig::default())?;
//! let request = parse_request(br#"{"values":[{"recordId":"1","data":{"question":"hello"}}]}"#)?;
//! let response = enrich_batch(provider.as_ref(), request, &EnrichmentConfig::default()).await;
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod types;

pub use crate::config::{EnrichmentConfig, VectorFields};
pub use crate::error::EnrichmentError;
pub use crate::types::{
    EnrichmentRequest, EnrichmentResponse, InputData, InputRecord, OutputData, OutputRecord,
    RecordError, RecordOutcome,
};
pub use semantic::{Embedding, EmbeddingProvider, SemanticError};

use serde_json::Value;

/// Message attached to every record whose provider call failed. The cause is logged, not returned.
pub const RECORD_ERROR_MESSAGE: &str = "There was an error during processing";

/// Parse and validate a whole batch.
///
/// Every record must carry `recordId` and a string `data.question`; the first
/// record that does not rejects the batch.
pub fn parse_request(body: &[u8]) -> Result<EnrichmentRequest, EnrichmentError> {
    let value: Value = serde_json::from_slice(body).map_err(EnrichmentError::MalformedJson)?;
    let Value::Object(mut map) = value else {
        return Err(EnrichmentError::NotAnObject);
    };
    let values = map.remove("values").ok_or(EnrichmentError::MissingValues)?;
    let Value::Array(items) = values else {
        return Err(EnrichmentError::ValuesNotArray);
    };

    let values = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|source| EnrichmentError::InvalidRecord { index, source })
        })
        .collect::<Result<Vec<InputRecord>, _>>()?;

    Ok(EnrichmentRequest { values })
}

/// Enrich every record in order, one provider call (or two) at a time.
pub async fn enrich_batch(
    provider: &dyn EmbeddingProvider,
    request: EnrichmentRequest,
    cfg: &EnrichmentConfig,
) -> EnrichmentResponse {
    let mut response = EnrichmentResponse {
        values: Vec::with_capacity(request.values.len()),
    };

    for record in request.values {
        response.values.push(enrich_record(provider, record, cfg).await);
    }

    tracing::info!(
        records = response.len(),
        failed = response.failed_count(),
        max_upstream_calls = response.len() * cfg.fields.calls_per_record(),
        provider = provider.name(),
        model = provider.model(),
        "batch enriched"
    );
    response
}

/// Parse `body` and enrich it. Convenience for HTTP handlers.
pub async fn process_body(
    provider: &dyn EmbeddingProvider,
    body: &[u8],
    cfg: &EnrichmentConfig,
) -> Result<EnrichmentResponse, EnrichmentError> {
    let request = parse_request(body)?;
    Ok(enrich_batch(provider, request, cfg).await)
}

/// Enrich a single record. Provider errors become an `errors` entry.
pub async fn enrich_record(
    provider: &dyn EmbeddingProvider,
    record: InputRecord,
    cfg: &EnrichmentConfig,
) -> OutputRecord {
    let InputRecord { record_id, data } = record;

    if cfg.fields == VectorFields::QuestionAndAnswer {
        let distinct_answer = data
            .answer
            .as_ref()
            .filter(|a| a.as_str() != Some(data.question.as_str()));
        if let Some(answer) = distinct_answer {
            tracing::warn!(
                record_id = %record_id,
                answer_is_string = answer.is_string(),
                "record has a distinct answer; answerVector is embedded from the question text"
            );
        }
    }

    match embed_fields(provider, &data.question, cfg.fields).await {
        Ok(output) => {
            tracing::debug!(record_id = %record_id, "record enriched");
            OutputRecord::enriched(record_id, output)
        }
        Err(err) => {
            tracing::warn!(
                record_id = %record_id,
                provider = provider.name(),
                transport = err.is_transport(),
                error = %err,
                "embedding failed for record"
            );
            OutputRecord::failed(record_id, RECORD_ERROR_MESSAGE)
        }
    }
}

async fn embed_fields(
    provider: &dyn EmbeddingProvider,
    text: &str,
    fields: VectorFields,
) -> Result<OutputData, SemanticError> {
    let question_vector = provider.embed(text).await?;
    let answer_vector = match fields {
        VectorFields::Question => None,
        VectorFields::QuestionAndAnswer => Some(provider.embed(text).await?),
    };
    Ok(OutputData {
        question_vector,
        answer_vector,
    })
}
