pub mod about;
pub mod auth;
pub mod contact;
pub mod hero;
pub mod messages;
pub mod projects;
pub mod seed;
pub mod services;
pub mod settings;
pub mod video;

use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::auth::is_authenticated;
use crate::database::{Database, DatabaseError};
use crate::error::ApiError;
use crate::gateway::request::Request;
use crate::gateway::response::Response;
use crate::gateway::routes::{handler, pattern_handler, RouteTable};
use crate::state::Ctx;

/// The full route map, mirroring the original serverless layout: literal
/// paths plus one-segment pattern routes for per-resource-id endpoints.
pub fn routes() -> RouteTable {
    RouteTable::new()
        .route("/api/health", handler(health))
        .route("/api/about", handler(about::index))
        .route("/api/about/certs", handler(about::certs))
        .route("/api/about/stats", handler(about::stats))
        .route("/api/auth/login", handler(auth::login))
        .route("/api/auth/logout", handler(auth::logout))
        .route("/api/auth/verify", handler(auth::verify))
        .route("/api/contact/config", handler(contact::config))
        .route("/api/contact/info", handler(contact::info))
        .route("/api/contact/items", handler(contact::items))
        .route("/api/contact/messages", handler(contact::messages))
        .route("/api/hero", handler(hero::index))
        .route("/api/hero/social", handler(hero::social))
        .route("/api/projects", handler(projects::index))
        .route("/api/projects/config", handler(projects::config))
        .route("/api/projects/create", handler(projects::create))
        .route("/api/seed", handler(seed::run))
        .route("/api/services", handler(services::index))
        .route("/api/services/config", handler(services::config))
        .route("/api/services/create", handler(services::create))
        .route("/api/settings", handler(settings::index))
        .route("/api/video", handler(video::index))
        .pattern("/api/about/certs", pattern_handler(about::certs_by_id))
        .pattern("/api/about/stats", pattern_handler(about::stats_by_id))
        .pattern("/api/contact/items", pattern_handler(contact::items_by_id))
        .pattern("/api/hero/social", pattern_handler(hero::social_by_id))
        .pattern("/api/messages", pattern_handler(messages::by_id))
        .pattern("/api/projects", pattern_handler(projects::by_id))
        .pattern("/api/services", pattern_handler(services::by_id))
}

async fn health(_ctx: Ctx, _req: Request) -> Result<Response> {
    Ok(Response::ok(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    })))
}

/// `Some(401)` when the request carries no valid bearer credential.
pub(crate) async fn require_auth(ctx: &Ctx, req: &Request) -> Option<Response> {
    if is_authenticated(ctx.verifier.as_ref(), req).await {
        None
    } else {
        Some(ApiError::unauthorized("Unauthorized").into_response())
    }
}

pub(crate) fn method_not_allowed() -> Response {
    ApiError::method_not_allowed("Method not allowed").into_response()
}

/// Decoded JSON body, or a 400 the handler returns as-is.
pub(crate) fn json_body(req: &Request) -> Result<&Value, Response> {
    req.json()
        .ok_or_else(|| ApiError::bad_request("Request body must be JSON").into_response())
}

/// Copy only the whitelisted fields that are present in the body.
pub(crate) fn whitelist(body: &Value, fields: &[&str]) -> Value {
    let mut out = Map::new();
    for field in fields {
        if let Some(value) = body.get(*field) {
            out.insert((*field).to_owned(), value.clone());
        }
    }
    Value::Object(out)
}

/// Update the single row of a one-row table, inserting it if absent.
pub(crate) async fn upsert_singleton(
    db: &Database,
    table: &str,
    fields: Value,
) -> Result<Value, DatabaseError> {
    match db.admin(table).limit(1).select_optional().await? {
        Some(existing) => {
            let id = id_string(existing.get("id").unwrap_or(&Value::Null));
            db.admin(table).eq("id", id).update(fields).await
        }
        None => db.admin(table).insert(fields).await,
    }
}

/// Row ids arrive as JSON numbers or strings depending on the table.
pub(crate) fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Log and translate a database failure into the handler's 500 message.
pub(crate) fn db_error(error: DatabaseError, message: &str) -> Response {
    tracing::error!(error = %error, "{message}");
    ApiError::internal(message).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::{HeaderMap, Method, StatusCode};
    use url::Url;

    use super::*;
    use crate::auth::{IdentityVerifier, Principal};
    use crate::gateway::request::Body;
    use crate::state::AppState;

    /// Rejects every token; exercises the auth gate without network I/O.
    struct DenyAll;

    #[async_trait]
    impl IdentityVerifier for DenyAll {
        async fn verify(&self, _token: &str) -> Option<Principal> {
            None
        }
    }

    fn test_ctx() -> Ctx {
        Arc::new(AppState {
            config: crate::config::config(),
            db: Database::new("http://localhost:1", "anon", ""),
            verifier: Arc::new(DenyAll),
        })
    }

    fn request(method: Method, path: &str, body: Body) -> Request {
        Request::new(
            method,
            Url::parse(&format!("http://localhost{path}")).unwrap(),
            HeaderMap::new(),
            body,
        )
    }

    #[tokio::test]
    async fn project_update_without_token_is_unauthorized() {
        let req = request(
            Method::PUT,
            "/api/projects/42",
            Body::Decoded(json!({ "title": "X" })),
        );
        let response = projects::by_id(test_ctx(), req, "42".into()).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn project_create_without_token_is_unauthorized() {
        let req = request(
            Method::POST,
            "/api/projects/create",
            Body::Decoded(json!({ "title": "X" })),
        );
        let response = projects::create(test_ctx(), req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn projects_index_rejects_non_get() {
        let req = request(Method::POST, "/api/projects", Body::Absent);
        let response = projects::index(test_ctx(), req).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn message_inbox_requires_auth() {
        let req = request(Method::GET, "/api/contact/messages", Body::Absent);
        let response = contact::messages(test_ctx(), req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn seed_requires_auth() {
        let req = request(Method::POST, "/api/seed", Body::Absent);
        let response = seed::run(test_ctx(), req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn deprecated_login_is_gone() {
        let req = request(Method::POST, "/api/auth/login", Body::Absent);
        let response = auth::login(test_ctx(), req).await.unwrap();
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[test]
    fn whitelist_keeps_only_known_present_fields() {
        let body = json!({"title": "A", "bogus": true, "is_active": false});
        let filtered = whitelist(&body, &["title", "description", "is_active"]);
        assert_eq!(filtered, json!({"title": "A", "is_active": false}));
    }

    #[test]
    fn id_string_handles_numbers_and_strings() {
        assert_eq!(id_string(&json!(42)), "42");
        assert_eq!(id_string(&json!("singleton")), "singleton");
    }
}
