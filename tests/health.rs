//! Integration tests for the liveness endpoint

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{ScriptedBackend, test_state};
use founderslens::handlers;
use tower::ServiceExt; // for `oneshot`

#[tokio::test]
async fn test_root_returns_running_status() {
    let backend = ScriptedBackend::new(vec![]);
    let app = handlers::router(test_state(backend.clone()));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "FoundersLens API is running");
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let app = handlers::router(test_state(ScriptedBackend::new(vec![])));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_on_analyze_not_allowed() {
    let app = handlers::router(test_state(ScriptedBackend::new(vec![])));

    let response = app
        .oneshot(Request::builder().uri("/analyze").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
