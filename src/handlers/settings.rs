use anyhow::Result;
use axum::http::Method;
use chrono::Utc;
use serde_json::json;

use crate::gateway::request::Request;
use crate::gateway::response::Response;
use crate::state::Ctx;

use super::{db_error, json_body, method_not_allowed, require_auth, upsert_singleton, whitelist};

const SETTINGS_FIELDS: &[&str] = &[
    "site_name",
    "logo_text",
    "logo_image_url",
    "site_description",
    "favicon_url",
];

/// GET/PUT /api/settings - site-wide settings with built-in defaults.
pub async fn index(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() == Method::GET {
        return match ctx.db.public("site_settings").select_optional().await {
            Ok(row) => Ok(Response::ok(row.unwrap_or_else(|| {
                // Missing or empty table is not an error for the public site
                json!({
                    "site_name": "Portfolio",
                    "logo_text": "Portfolio",
                    "site_description": "Personal Portfolio Website",
                })
            }))),
            Err(error) => Ok(db_error(error, "Failed to fetch settings")),
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
        let mut fields = whitelist(body, SETTINGS_FIELDS);
        fields["updated_at"] = json!(Utc::now());
        return match upsert_singleton(&ctx.db, "site_settings", fields).await {
            Ok(row) => Ok(Response::ok(row)),
            Err(error) => Ok(db_error(error, "Failed to update settings")),
        };
    }

    Ok(method_not_allowed())
}
