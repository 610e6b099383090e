use crate::error::ServerError;
use crate::state::ServerState;
use axum::extract::{Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, Uri};
use axum::middleware::Next;
use axum::response::Response;
use serde::Deserialize;
use std::sync::Arc;

/// Query string carrying a function key (`?code=<key>`)
#[derive(Debug, Default, Deserialize)]
pub struct FunctionKeyQuery {
    pub code: Option<String>,
}

/// Function key authentication middleware
///
/// The key may arrive as `x-functions-key`, `x-api-key`, `Authorization: Bearer <key>`,
/// or the `code` query parameter, checked in that order. The query string is only
/// parsed when no header carries a key, and a query it cannot parse counts as no key.
pub async fn function_key_auth(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let headers = request.headers();
    let key = headers
        .get("x-functions-key")
        .or_else(|| headers.get("x-api-key"))
        .or_else(|| headers.get(AUTHORIZATION))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.strip_prefix("Bearer ").unwrap_or(s).to_string())
        .or_else(|| query_key(request.uri()));

    match key {
        Some(key) => {
            if !state.is_valid_function_key(&key) {
                return Err(ServerError::Authentication(
                    "Invalid function key".to_string(),
                ));
            }
            Ok(next.run(request).await)
        }
        None => Err(ServerError::Authentication(
            "Function key required. Provide it in 'x-functions-key' header or 'code' query parameter"
                .to_string(),
        )),
    }
}

fn query_key(uri: &Uri) -> Option<String> {
    Query::<FunctionKeyQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(query)| query.code)
}

/// Request ID injection middleware
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }

    response
}

/// Request identifier stored in request extensions
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Logging middleware
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = std::time::Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    tracing::info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        "Request started"
    );

    let response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %path,
        status = %status,
        duration_ms = %duration.as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}
