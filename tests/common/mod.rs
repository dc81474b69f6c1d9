use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};
use uuid::Uuid;

use portfolio_api_rust::auth::{is_authenticated, IdentityVerifier, Principal};
use portfolio_api_rust::config;
use portfolio_api_rust::database::Database;
use portfolio_api_rust::error::ApiError;
use portfolio_api_rust::gateway::cors::CorsPolicy;
use portfolio_api_rust::gateway::request::Request;
use portfolio_api_rust::gateway::response::Response;
use portfolio_api_rust::gateway::routes::{handler, pattern_handler, RouteTable};
use portfolio_api_rust::gateway::{app, Gateway};
use portfolio_api_rust::state::{AppState, Ctx};

pub const VALID_TOKEN: &str = "valid-token";
pub const ALLOWED_ORIGIN: &str = "https://portfolio.example.com";

/// Accepts exactly one token; everything else is unauthenticated.
struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Option<Principal> {
        (token == VALID_TOKEN).then(|| Principal {
            id: Uuid::new_v4(),
            email: Some("admin@example.com".to_string()),
            role: None,
        })
    }
}

async fn ping(_ctx: Ctx, _req: Request) -> anyhow::Result<Response> {
    Ok(Response::ok(json!({ "pong": true })))
}

/// Echoes the decoded body back so tests can assert the adapt round trip.
async fn echo(_ctx: Ctx, req: Request) -> anyhow::Result<Response> {
    Ok(Response::ok(req.json().cloned().unwrap_or(Value::Null)))
}

async fn widget(_ctx: Ctx, _req: Request, id: String) -> anyhow::Result<Response> {
    Ok(Response::ok(json!({ "id": id })))
}

async fn boom(_ctx: Ctx, _req: Request) -> anyhow::Result<Response> {
    Err(anyhow!("database exploded"))
}

async fn private(ctx: Ctx, req: Request) -> anyhow::Result<Response> {
    if !is_authenticated(ctx.verifier.as_ref(), &req).await {
        return Ok(ApiError::unauthorized("Unauthorized").into_response());
    }
    Ok(Response::json(
        StatusCode::OK,
        json!({ "success": true, "authenticated": true }),
    ))
}

fn stub_routes() -> RouteTable {
    RouteTable::new()
        .route("/api/ping", handler(ping))
        .route("/api/echo", handler(echo))
        .route("/api/boom", handler(boom))
        .route("/api/private", handler(private))
        .pattern("/api/widgets", pattern_handler(widget))
}

/// Gateway wired with stub handlers and a stub verifier; no network I/O.
pub fn test_app() -> Router {
    let state = Arc::new(AppState {
        config: config::config(),
        db: Database::new("http://localhost:1", "anon", ""),
        verifier: Arc::new(StubVerifier),
    });
    let gateway = Gateway::new(
        stub_routes(),
        CorsPolicy::new(vec![ALLOWED_ORIGIN.to_string()]),
        state,
    );
    app(Arc::new(gateway))
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
