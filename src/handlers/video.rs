use anyhow::Result;
use axum::http::Method;
use chrono::Utc;
use serde_json::json;

use crate::gateway::request::Request;
use crate::gateway::response::Response;
use crate::state::Ctx;

use super::{db_error, json_body, method_not_allowed, require_auth, upsert_singleton, whitelist};

/// GET/PUT /api/video - one-row video section.
pub async fn index(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() == Method::GET {
        return match ctx.db.public("video_sections").select_optional().await {
            Ok(row) => Ok(Response::ok(row.unwrap_or_else(|| json!({})))),
            Err(error) => Ok(db_error(error, "Failed to fetch video data")),
        };
    }

    if req.method() == Method::PUT {
        if let Some(denied) = require_auth(&ctx, &req).await {
            return Ok(denied);
        }
        let body = match json_body(&req) {
            Ok(body) => body,
            Err(response) => return Ok(response),
        };
        let mut fields = whitelist(
            body,
            &["subtitle", "description", "video_url", "cover_image_url"],
        );
        fields["updated_at"] = json!(Utc::now());
        return match upsert_singleton(&ctx.db, "video_sections", fields).await {
            Ok(row) => Ok(Response::ok(row)),
            Err(error) => Ok(db_error(error, "Failed to update video section")),
        };
    }

    Ok(method_not_allowed())
}
