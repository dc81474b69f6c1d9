use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Map, Value};

use crate::gateway::request::Request;
use crate::gateway::response::Response;
use crate::state::Ctx;

use super::{db_error, json_body, method_not_allowed, require_auth, upsert_singleton, whitelist};

/// GET/PUT /api/about - section copy plus stats and certifications.
pub async fn index(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() == Method::GET {
        let about = ctx
            .db
            .public("about_sections")
            .select_optional()
            .await
            .unwrap_or_else(|error| {
                tracing::error!(error = %error, "failed to fetch about section");
                None
            })
            .unwrap_or_else(|| json!({}));

        let stats = ctx
            .db
            .public("about_stats")
            .order("display_order", true)
            .select_all()
            .await
            .unwrap_or_default();

        let certs = ctx
            .db
            .public("certifications")
            .order("date", false)
            .select_all()
            .await
            .unwrap_or_default();

        let mut data = match about {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        data.insert("about_stats".to_owned(), Value::Array(stats));
        data.insert("certifications".to_owned(), Value::Array(certs));
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
        let fields = whitelist(body, &["title", "description_1", "description_2"]);
        return match upsert_singleton(&ctx.db, "about_sections", fields).await {
            Ok(row) => Ok(Response::json(
                StatusCode::OK,
                json!({ "success": true, "message": "About section updated", "data": row }),
            )),
            Err(error) => Ok(db_error(error, "Failed to update about data")),
        };
    }

    Ok(method_not_allowed())
}

/// POST /api/about/certs - protected.
pub async fn certs(ctx: Ctx, req: Request) -> Result<Response> {
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
    match ctx.db.admin("certifications").insert(body.clone()).await {
        Ok(created) => Ok(Response::json(
            StatusCode::CREATED,
            json!({ "success": true, "data": created }),
        )),
        Err(error) => Ok(db_error(error, "Failed to add cert")),
    }
}

/// PUT/DELETE /api/about/certs/{id} - protected.
pub async fn certs_by_id(ctx: Ctx, req: Request, id: String) -> Result<Response> {
    if let Some(denied) = require_auth(&ctx, &req).await {
        return Ok(denied);
    }

    if req.method() == Method::PUT {
        let body = match json_body(&req) {
            Ok(body) => body,
            Err(response) => return Ok(response),
        };
        return match ctx
            .db
            .admin("certifications")
            .eq("id", &id)
            .update(body.clone())
            .await
        {
            Ok(row) => Ok(Response::ok(row)),
            Err(error) => Ok(db_error(error, "Failed to update cert")),
        };
    }

    if req.method() == Method::DELETE {
        return match ctx.db.admin("certifications").eq("id", &id).delete().await {
            Ok(()) => Ok(Response::json(StatusCode::OK, json!({ "success": true }))),
            Err(error) => Ok(db_error(error, "Failed to delete cert")),
        };
    }

    Ok(method_not_allowed())
}

/// POST /api/about/stats - protected.
pub async fn stats(ctx: Ctx, req: Request) -> Result<Response> {
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
    let row = json!({
        "label": body.get("label").cloned().unwrap_or(Value::Null),
        "value": body.get("value").cloned().unwrap_or(Value::Null),
        "display_order": body.get("display_order").cloned().unwrap_or_else(|| json!(0)),
    });
    match ctx.db.admin("about_stats").insert(row).await {
        Ok(created) => Ok(Response::json(
            StatusCode::CREATED,
            json!({ "success": true, "data": created }),
        )),
        Err(error) => Ok(db_error(error, "Failed to add stat")),
    }
}

/// PUT/DELETE /api/about/stats/{id} - protected.
pub async fn stats_by_id(ctx: Ctx, req: Request, id: String) -> Result<Response> {
    if let Some(denied) = require_auth(&ctx, &req).await {
        return Ok(denied);
    }

    if req.method() == Method::PUT {
        let body = match json_body(&req) {
            Ok(body) => body,
            Err(response) => return Ok(response),
        };
        let fields = whitelist(body, &["label", "value", "display_order"]);
        return match ctx.db.admin("about_stats").eq("id", &id).update(fields).await {
            Ok(row) => Ok(Response::ok(row)),
            Err(error) => Ok(db_error(error, "Failed to update stat")),
        };
    }

    if req.method() == Method::DELETE {
        return match ctx.db.admin("about_stats").eq("id", &id).delete().await {
            Ok(()) => Ok(Response::json(StatusCode::OK, json!({ "success": true }))),
            Err(error) => Ok(db_error(error, "Failed to delete stat")),
        };
    }

    Ok(method_not_allowed())
}
