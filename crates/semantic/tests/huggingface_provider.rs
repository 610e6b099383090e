//! Hugging Face client tests against a local mock HTTP server.

use mockito::Matcher;
use semantic::{EmbeddingProvider, HuggingFaceProvider, ProviderConfig, SemanticError};
use serde_json::json;

fn config_for(server: &mockito::ServerGuard, token: Option<&str>) -> ProviderConfig {
    ProviderConfig {
        api_base: format!("{}/pipeline/feature-extraction", server.url()),
        model_id: "sentence-transformers/all-MiniLM-L6-v2".into(),
        hf_token: token.map(str::to_string),
        ..Default::default()
    }
}

const MODEL_PATH: &str = "/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2";

#[tokio::test]
async fn sends_bearer_token_and_wait_for_model() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .match_header("authorization", "Bearer hf_test")
        .match_body(Matcher::Json(json!({
            "inputs": "hello",
            "options": { "wait_for_model": true }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[0.1,0.2]")
        .create_async()
        .await;

    let provider = HuggingFaceProvider::new(&config_for(&server, Some("hf_test"))).unwrap();
    let embedding = provider.embed("hello").await.unwrap();

    assert_eq!(embedding.as_value(), &json!([0.1, 0.2]));
    mock.assert_async().await;
}

#[tokio::test]
async fn omits_authorization_without_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("[[0.5,0.5],[0.25,0.75]]")
        .create_async()
        .await;

    let provider = HuggingFaceProvider::new(&config_for(&server, None)).unwrap();
    let embedding = provider.embed("two tokens").await.unwrap();

    assert_eq!(embedding.shape(), vec![2, 2]);
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", MODEL_PATH)
        .with_status(503)
        .with_body(r#"{"error":"Model is currently loading","estimated_time":20.0}"#)
        .create_async()
        .await;

    let provider = HuggingFaceProvider::new(&config_for(&server, Some("hf_test"))).unwrap();
    let err = provider.embed("hello").await.unwrap_err();

    match err {
        SemanticError::Status { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("loading"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_object_with_ok_status_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", MODEL_PATH)
        .with_status(200)
        .with_body(r#"{"error":"Authorization header is invalid"}"#)
        .create_async()
        .await;

    let provider = HuggingFaceProvider::new(&config_for(&server, None)).unwrap();
    let err = provider.embed("hello").await.unwrap_err();
    assert!(matches!(err, SemanticError::InvalidResponse(_)));
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", MODEL_PATH)
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let provider = HuggingFaceProvider::new(&config_for(&server, None)).unwrap();
    let err = provider.embed("hello").await.unwrap_err();
    assert!(matches!(err, SemanticError::InvalidResponse(_)));
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
    let cfg = ProviderConfig {
        api_base: "http://127.0.0.1:1/pipeline".into(),
        timeout_secs: Some(5),
        ..Default::default()
    };
    let provider = HuggingFaceProvider::new(&cfg).unwrap();
    let err = provider.embed("hello").await.unwrap_err();
    assert!(err.is_transport());
}
