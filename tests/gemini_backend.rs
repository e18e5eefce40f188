//! Integration tests for the Gemini REST backend
//!
//! Uses wiremock to stand in for the generateContent API and checks request
//! shape, text collection and failure classification.

use founderslens::models::{
    BackendError, Credential, FailureKind, GeminiBackend, InvocationOutcome, InvocationRequest,
    ModelBackend, ModelIdentity, ModelInvoker, RetryPolicy,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-2.5-flash-lite";
const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-lite:generateContent";

fn backend(server: &MockServer, search_grounding: bool) -> GeminiBackend {
    GeminiBackend::new(&format!("{}/v1beta", server.uri()), 5, search_grounding)
        .expect("backend should build")
}

fn key() -> Credential {
    Credential::new("test-api-key").unwrap()
}

fn candidate_response(parts: &[&str]) -> serde_json::Value {
    let parts: Vec<_> = parts.iter().map(|t| json!({ "text": t })).collect();
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts }
        }]
    })
}

#[tokio::test]
async fn test_generate_sends_key_header_and_collects_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-api-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "analyze this" }] }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_response(&["{\"research\":", " {}}"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = backend(&server, false)
        .generate(MODEL, &key(), "analyze this")
        .await
        .unwrap();

    assert_eq!(text, "{\"research\": {}}");
}

#[tokio::test]
async fn test_search_grounding_attaches_tool() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({ "tools": [{ "google_search": {} }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_response(&["ok"])))
        .expect(1)
        .mount(&server)
        .await;

    let text = backend(&server, true)
        .generate(MODEL, &key(), "prompt")
        .await
        .unwrap();

    assert_eq!(text, "ok");
}

#[tokio::test]
async fn test_http_429_is_quota_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "You exceeded your current quota.",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .mount(&server)
        .await;

    let err = backend(&server, false)
        .generate(MODEL, &key(), "prompt")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackendError::QuotaExhausted {
            status: 429,
            message: "You exceeded your current quota.".to_string()
        }
    );
}

#[tokio::test]
async fn test_resource_exhausted_marker_with_other_status_is_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "Quota gone", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let err = backend(&server, false)
        .generate(MODEL, &key(), "prompt")
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::QuotaExhausted { status: 403, .. }));
}

#[tokio::test]
async fn test_server_error_is_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let err = backend(&server, false)
        .generate(MODEL, &key(), "prompt")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackendError::Http {
            status: 500,
            message: "backend exploded".to_string()
        }
    );
    assert_eq!(FailureKind::from(&err), FailureKind::ExecutionError);
}

#[tokio::test]
async fn test_malformed_success_body_is_other_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let err = backend(&server, false)
        .generate(MODEL, &key(), "prompt")
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Other(ref msg) if msg.contains("Malformed")));
}

#[tokio::test]
async fn test_connection_refused_is_connection_error() {
    // Port 1 is reserved and nothing listens there
    let backend = GeminiBackend::new("http://127.0.0.1:1/v1beta", 5, false).unwrap();

    let err = backend.generate(MODEL, &key(), "prompt").await.unwrap_err();

    assert!(matches!(err, BackendError::Connection(_)), "got: {:?}", err);
    assert_eq!(FailureKind::from(&err), FailureKind::ConnectionError);
}

#[tokio::test]
async fn test_invoker_retries_configured_status_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_response(&["{}"])))
        .expect(1)
        .mount(&server)
        .await;

    let invoker = ModelInvoker::new(Arc::new(backend(&server, false)));
    let identity = ModelIdentity::new(MODEL, key(), RetryPolicy::new(2, vec![503], 10).unwrap());

    let outcome = invoker
        .invoke(InvocationRequest::new("prompt", &identity))
        .await;

    assert_eq!(
        outcome,
        InvocationOutcome::Success {
            text: "{}".to_string()
        }
    );
}

#[tokio::test]
async fn test_invoker_never_retries_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
        .expect(1)
        .mount(&server)
        .await;

    let invoker = ModelInvoker::new(Arc::new(backend(&server, false)));
    let identity = ModelIdentity::new(MODEL, key(), RetryPolicy::new(3, vec![429], 10).unwrap());

    let outcome = invoker
        .invoke(InvocationRequest::new("prompt", &identity))
        .await;

    assert!(matches!(
        outcome,
        InvocationOutcome::Failure {
            kind: FailureKind::QuotaExhausted,
            ..
        }
    ));
}
