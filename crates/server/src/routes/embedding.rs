use crate::error::ServerResult;
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use enrichment::EnrichmentResponse;
use std::sync::Arc;

/// Enrich a batch of records with question (and answer) vectors.
///
/// The body is read raw so that every parse failure, including malformed JSON,
/// goes through [`ServerError::InvalidBatch`](crate::error::ServerError) and
/// answers 401 with an empty `values` array.
///
/// # Example
/// ```json
/// // Request
/// {"values": [{"recordId": "1", "data": {"question": "hello"}}]}
///
/// // Response (200)
/// {"values": [{"recordID": "1", "data": {"questionVector": [0.1, 0.2], "answerVector": [0.1, 0.2]}}]}
/// ```
pub async fn get_custom_embedding(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> ServerResult<Json<EnrichmentResponse>> {
    tracing::info!(bytes = body.len(), "custom embedding request received");

    let request = enrichment::parse_request(&body).inspect_err(|err| {
        state.stats.record_rejected();
        tracing::warn!(error = %err, "rejecting unparseable batch");
    })?;

    let response = enrichment::enrich_batch(
        state.provider.as_ref(),
        request,
        &state.config.enrichment,
    )
    .await;

    state
        .stats
        .record_batch(response.len(), response.failed_count());

    Ok(Json(response))
}
