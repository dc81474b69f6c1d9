//! Legacy auth endpoints. Token issuance moved to the identity provider;
//! login and verify answer 410 Gone, logout still clears stored sessions for
//! clients on the old cookie flow.

use anyhow::Result;
use axum::http::header::{HeaderValue, SET_COOKIE};
use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::auth::session::{
    clear_session_cookie, delete_session, parse_cookies, verify_session, SESSION_COOKIE_NAME,
};
use crate::gateway::request::Request;
use crate::gateway::response::Response;
use crate::state::Ctx;

use super::method_not_allowed;

/// POST /api/auth/login - deprecated.
pub async fn login(_ctx: Ctx, _req: Request) -> Result<Response> {
    Ok(Response::json(
        StatusCode::GONE,
        json!({
            "message": "This endpoint is deprecated. Use the identity provider for authentication.",
            "deprecated": true,
        }),
    ))
}

/// GET /api/auth/verify - deprecated. Still honors a stored session cookie
/// as a fallback for clients that have not migrated to bearer tokens.
pub async fn verify(ctx: Ctx, req: Request) -> Result<Response> {
    let cookies = parse_cookies(req.header("cookie"));
    if let Some(token) = cookies.get(SESSION_COOKIE_NAME) {
        if verify_session(&ctx.db, token).await.is_some() {
            return Ok(Response::json(
                StatusCode::OK,
                json!({ "success": true, "authenticated": true, "deprecated": true }),
            ));
        }
    }

    Ok(Response::json(
        StatusCode::GONE,
        json!({
            "message": "This endpoint is deprecated. Use the identity provider for session verification.",
            "deprecated": true,
            "authenticated": false,
        }),
    ))
}

/// POST /api/auth/logout - deletes the stored session named by the cookie
/// and clears it client-side.
pub async fn logout(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() != Method::POST {
        return Ok(method_not_allowed());
    }

    let cookies = parse_cookies(req.header("cookie"));
    if let Some(token) = cookies.get(SESSION_COOKIE_NAME) {
        if let Err(error) = delete_session(&ctx.db, token).await {
            tracing::warn!(error = %error, "failed to delete stored session");
        }
    }

    let mut response = Response::json(
        StatusCode::OK,
        json!({ "success": true, "message": "Logged out successfully" }),
    );
    if let Ok(value) = HeaderValue::from_str(&clear_session_cookie()) {
        response.insert_header(SET_COOKIE, value);
    }
    Ok(response)
}
