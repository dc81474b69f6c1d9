use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::gateway::request::Request;
use crate::gateway::response::Response;
use crate::state::Ctx;

use super::{db_error, json_body, method_not_allowed, require_auth, upsert_singleton, whitelist};

const HERO_FIELDS: &[&str] = &[
    "greeting",
    "name",
    "role",
    "status_text",
    "hero_image_url",
    "hero_video_url",
];

/// GET/PUT /api/hero - single hero row plus its social links.
pub async fn index(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() == Method::GET {
        let hero = match ctx.db.public("hero_sections").select_optional().await {
            Ok(row) => row.unwrap_or_else(|| json!({})),
            Err(error) => return Ok(db_error(error, "Failed to fetch hero data")),
        };

        // Social links ride along; a failure here degrades to an empty list.
        let social = ctx
            .db
            .public("social_links")
            .order("display_order", true)
            .select_all()
            .await
            .unwrap_or_else(|error| {
                tracing::error!(error = %error, "failed to fetch social links");
                Vec::new()
            });

        let mut data = match hero {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        data.insert("social_links".to_owned(), Value::Array(social));
        return Ok(Response::ok(Value::Object(data)));
    }

    if req.method() == Method::PUT {
        if let Some(denied) = require_auth(&ctx, &req).await {
            return Ok(denied);
        }
        let body = match json_body(&req) {
            Ok(body) => body,
            Err(response) => return Ok(response),
        };
        let fields = whitelist(body, HERO_FIELDS);
        return match upsert_singleton(&ctx.db, "hero_sections", fields).await {
            Ok(row) => Ok(Response::json(
                StatusCode::OK,
                json!({ "success": true, "message": "Hero section updated", "data": row }),
            )),
            Err(error) => Ok(db_error(error, "Failed to update hero data")),
        };
    }

    Ok(method_not_allowed())
}

/// POST /api/hero/social - protected.
pub async fn social(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() != Method::POST {
        return Ok(method_not_allowed());
    }
    if let Some(denied) = require_auth(&ctx, &req).await {
        return Ok(denied);
    }

    let body = match json_body(&req) {
        Ok(body) => body,
        Err(response) => return Ok(response),
    };

    if body.get("platform").is_none() || body.get("url").is_none() {
        return Ok(ApiError::bad_request("Platform and URL are required").into_response());
    }

    let row = json!({
        "platform": body["platform"],
        "url": body["url"],
        "icon": body.get("icon").cloned().unwrap_or_else(|| json!("Globe")),
        "display_order": body.get("display_order").cloned().unwrap_or_else(|| json!(0)),
    });

    match ctx.db.admin("social_links").insert(row).await {
        Ok(created) => Ok(Response::json(
            StatusCode::CREATED,
            json!({ "success": true, "message": "Social link added", "data": created }),
        )),
        Err(error) => Ok(db_error(error, "Failed to add social link")),
    }
}

/// PUT/DELETE /api/hero/social/{id} - protected.
pub async fn social_by_id(ctx: Ctx, req: Request, id: String) -> Result<Response> {
    if let Some(denied) = require_auth(&ctx, &req).await {
        return Ok(denied);
    }

    if req.method() == Method::PUT {
        let body = match json_body(&req) {
            Ok(body) => body,
            Err(response) => return Ok(response),
        };
        let fields = whitelist(body, &["platform", "url", "icon", "display_order"]);
        return match ctx.db.admin("social_links").eq("id", &id).update(fields).await {
            Ok(row) => Ok(Response::json(
                StatusCode::OK,
                json!({ "success": true, "message": "Social link updated", "data": row }),
            )),
            Err(error) => Ok(db_error(error, "Failed to update social link")),
        };
    }

    if req.method() == Method::DELETE {
        return match ctx.db.admin("social_links").eq("id", &id).delete().await {
            Ok(()) => Ok(Response::json(
                StatusCode::OK,
                json!({ "success": true, "message": "Social link deleted" }),
            )),
            Err(error) => Ok(db_error(error, "Failed to delete social link")),
        };
    }

    Ok(method_not_allowed())
}
