use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::gateway::request::Request;
use crate::gateway::response::Response;
use crate::state::Ctx;

use super::{db_error, json_body, method_not_allowed, require_auth, upsert_singleton, whitelist};

const UPDATE_FIELDS: &[&str] = &[
    "title",
    "category",
    "image",
    "description",
    "tags",
    "github_url",
    "demo_url",
    "is_featured",
    "display_order",
    "is_active",
];

/// GET /api/projects - public listing with optional filters.
pub async fn index(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() != Method::GET {
        return Ok(method_not_allowed());
    }

    let mut query = ctx.db.public("projects").order("display_order", true);

    if let Some(category) = req.query("category") {
        query = query.eq("category", category);
    }
    if req.query("featured").as_deref() == Some("true") {
        query = query.eq("is_featured", true);
    }
    // Public requests only see active projects
    if req.query("includeInactive").as_deref() != Some("true") {
        query = query.eq("is_active", true);
    }
    if let Some(limit) = req.query("limit").and_then(|v| v.parse().ok()) {
        query = query.limit(limit);
    }

    let rows = match query.select_all().await {
        Ok(rows) => rows,
        Err(error) => return Ok(db_error(error, "Failed to fetch projects")),
    };

    Ok(Response::json(
        StatusCode::OK,
        json!({ "success": true, "data": rows, "count": rows.len() }),
    ))
}

/// POST /api/projects/create - protected.
pub async fn create(ctx: Ctx, req: Request) -> Result<Response> {
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

    let Some(title) = body.get("title").and_then(Value::as_str) else {
        return Ok(ApiError::bad_request("Title is required").into_response());
    };

    let row = json!({
        "title": title,
        "category": body.get("category").cloned().unwrap_or_else(|| json!("")),
        "image": body.get("image").cloned().unwrap_or_else(|| json!("")),
        "description": body.get("description").cloned().unwrap_or_else(|| json!("")),
        "tags": body.get("tags").cloned().unwrap_or_else(|| json!([])),
        "github_url": body.get("github_url").cloned().unwrap_or_else(|| json!("")),
        "demo_url": body.get("demo_url").cloned().unwrap_or_else(|| json!("")),
        "is_featured": body.get("is_featured").cloned().unwrap_or_else(|| json!(false)),
        "display_order": body.get("display_order").cloned().unwrap_or_else(|| json!(0)),
        "is_active": body.get("is_active") != Some(&json!(false)),
    });

    match ctx.db.admin("projects").insert(row).await {
        Ok(created) => Ok(Response::json(
            StatusCode::CREATED,
            json!({ "success": true, "message": "Project created successfully", "data": created }),
        )),
        Err(error) => Ok(db_error(error, "Failed to create project")),
    }
}

/// GET/PUT /api/projects/config - one-row section copy.
pub async fn config(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() == Method::GET {
        return match ctx.db.public("projects_sections").select_optional().await {
            Ok(row) => Ok(Response::ok(row.unwrap_or_else(|| json!({})))),
            Err(error) => Ok(db_error(error, "Failed to fetch config")),
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
        let fields = whitelist(body, &["title", "description"]);
        return match upsert_singleton(&ctx.db, "projects_sections", fields).await {
            Ok(row) => Ok(Response::ok(row)),
            Err(error) => Ok(db_error(error, "Failed to update config")),
        };
    }

    Ok(method_not_allowed())
}

/// GET/PUT/DELETE /api/projects/{id} - writes are protected.
pub async fn by_id(ctx: Ctx, req: Request, id: String) -> Result<Response> {
    if req.method() == Method::GET {
        return match ctx.db.public("projects").eq("id", &id).select_one().await {
            Ok(row) => Ok(Response::ok(row)),
            Err(DatabaseError::NotFound) => {
                Ok(ApiError::not_found("Project not found").into_response())
            }
            Err(error) => Ok(db_error(error, "Failed to fetch project")),
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
        let fields = whitelist(body, UPDATE_FIELDS);
        return match ctx.db.admin("projects").eq("id", &id).update(fields).await {
            Ok(row) => Ok(Response::json(
                StatusCode::OK,
                json!({ "success": true, "message": "Project updated successfully", "data": row }),
            )),
            Err(DatabaseError::NotFound) => {
                Ok(ApiError::not_found("Project not found").into_response())
            }
            Err(error) => Ok(db_error(error, "Failed to update project")),
        };
    }

    if req.method() == Method::DELETE {
        if let Some(denied) = require_auth(&ctx, &req).await {
            return Ok(denied);
        }
        return match ctx.db.admin("projects").eq("id", &id).delete().await {
            Ok(()) => Ok(Response::json(
                StatusCode::OK,
                json!({ "success": true, "message": "Project deleted successfully" }),
            )),
            Err(error) => Ok(db_error(error, "Failed to delete project")),
        };
    }

    Ok(method_not_allowed())
}
