use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::gateway::request::Request;
use crate::gateway::response::Response;
use crate::state::Ctx;

use super::{db_error, json_body, method_not_allowed, require_auth, whitelist};

/// GET/PUT/DELETE /api/messages/{id} - the admin inbox, fully protected.
pub async fn by_id(ctx: Ctx, req: Request, id: String) -> Result<Response> {
    if let Some(denied) = require_auth(&ctx, &req).await {
        return Ok(denied);
    }

    if req.method() == Method::GET {
        return match ctx.db.admin("messages").eq("id", &id).select_one().await {
            Ok(row) => Ok(Response::ok(row)),
            Err(DatabaseError::NotFound) => {
                Ok(ApiError::not_found("Message not found").into_response())
            }
            Err(error) => Ok(db_error(error, "Failed to fetch message")),
        };
    }

    if req.method() == Method::PUT {
        let body = match json_body(&req) {
            Ok(body) => body,
            Err(response) => return Ok(response),
        };
        // Only the read flag is writable
        let fields = whitelist(body, &["is_read"]);
        return match ctx.db.admin("messages").eq("id", &id).update(fields).await {
            Ok(row) => Ok(Response::json(
                StatusCode::OK,
                json!({ "success": true, "message": "Message updated successfully", "data": row }),
            )),
            Err(DatabaseError::NotFound) => {
                Ok(ApiError::not_found("Message not found").into_response())
            }
            Err(error) => Ok(db_error(error, "Failed to update message")),
        };
    }

    if req.method() == Method::DELETE {
        return match ctx.db.admin("messages").eq("id", &id).delete().await {
            Ok(()) => Ok(Response::json(
                StatusCode::OK,
                json!({ "success": true, "message": "Message deleted successfully" }),
            )),
            Err(error) => Ok(db_error(error, "Failed to delete message")),
        };
    }

    Ok(method_not_allowed())
}
