mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, test_app, VALID_TOKEN};

fn private_request(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri("/api/private");
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn valid_bearer_token_is_authenticated() {
    let response = test_app()
        .oneshot(private_request(Some(&format!("Bearer {VALID_TOKEN}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["authenticated"], json!(true));
}

#[tokio::test]
async fn missing_header_is_unauthorized() {
    let response = test_app().oneshot(private_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Unauthorized"));
}

#[tokio::test]
async fn malformed_scheme_is_unauthorized() {
    let response = test_app()
        .oneshot(private_request(Some("Basic dXNlcjpwYXNz")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_is_unauthorized() {
    let response = test_app()
        .oneshot(private_request(Some("Bearer wrong-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
