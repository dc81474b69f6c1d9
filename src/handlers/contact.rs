use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::gateway::request::Request;
use crate::gateway::response::Response;
use crate::state::Ctx;

use super::{db_error, json_body, method_not_allowed, require_auth, upsert_singleton, whitelist};

/// GET/PUT /api/contact/config - one-row section copy.
pub async fn config(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() == Method::GET {
        return match ctx.db.public("contact_sections").select_optional().await {
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
        return match upsert_singleton(&ctx.db, "contact_sections", fields).await {
            Ok(row) => Ok(Response::ok(row)),
            Err(error) => Ok(db_error(error, "Failed to update config")),
        };
    }

    Ok(method_not_allowed())
}

/// GET/PUT /api/contact/info - fixed "singleton" row.
pub async fn info(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() == Method::GET {
        return match ctx
            .db
            .public("contact_info")
            .eq("id", "singleton")
            .select_one()
            .await
        {
            Ok(row) => Ok(Response::ok(row)),
            Err(error) => Ok(db_error(error, "Failed to fetch contact info")),
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
        let fields = whitelist(body, &["email", "phone", "location", "social_links"]);
        return match ctx
            .db
            .admin("contact_info")
            .eq("id", "singleton")
            .update(fields)
            .await
        {
            Ok(row) => Ok(Response::json(
                StatusCode::OK,
                json!({ "success": true, "message": "Contact info updated successfully", "data": row }),
            )),
            Err(error) => Ok(db_error(error, "Failed to update contact info")),
        };
    }

    Ok(method_not_allowed())
}

/// GET/POST /api/contact/items - contact cards shown on the site.
pub async fn items(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() == Method::GET {
        return match ctx
            .db
            .public("contact_items")
            .order("display_order", true)
            .select_all()
            .await
        {
            Ok(rows) => Ok(Response::ok(Value::Array(rows))),
            Err(error) => Ok(db_error(error, "Failed to fetch contact items")),
        };
    }

    if req.method() == Method::POST {
        if let Some(denied) = require_auth(&ctx, &req).await {
            return Ok(denied);
        }
        let body = match json_body(&req) {
            Ok(body) => body,
            Err(response) => return Ok(response),
        };
        return match ctx.db.admin("contact_items").insert(body.clone()).await {
            Ok(created) => Ok(Response::json(
                StatusCode::CREATED,
                json!({ "success": true, "data": created }),
            )),
            Err(error) => Ok(db_error(error, "Failed to add contact item")),
        };
    }

    Ok(method_not_allowed())
}

/// PUT/DELETE /api/contact/items/{id} - protected.
pub async fn items_by_id(ctx: Ctx, req: Request, id: String) -> Result<Response> {
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
            .admin("contact_items")
            .eq("id", &id)
            .update(body.clone())
            .await
        {
            Ok(row) => Ok(Response::ok(row)),
            Err(error) => Ok(db_error(error, "Failed to update item")),
        };
    }

    if req.method() == Method::DELETE {
        return match ctx.db.admin("contact_items").eq("id", &id).delete().await {
            Ok(()) => Ok(Response::json(StatusCode::OK, json!({ "success": true }))),
            Err(error) => Ok(db_error(error, "Failed to delete item")),
        };
    }

    Ok(method_not_allowed())
}

/// GET /api/contact/messages (protected inbox) and POST (public contact form).
pub async fn messages(ctx: Ctx, req: Request) -> Result<Response> {
    if req.method() == Method::GET {
        if let Some(denied) = require_auth(&ctx, &req).await {
            return Ok(denied);
        }

        let mut query = ctx.db.admin("messages").order("created_at", false);
        if req.query("unread").as_deref() == Some("true") {
            query = query.eq("is_read", false);
        }
        if let Some(limit) = req.query("limit").and_then(|v| v.parse().ok()) {
            query = query.limit(limit);
        }

        let rows = match query.select_all().await {
            Ok(rows) => rows,
            Err(error) => return Ok(db_error(error, "Failed to fetch messages")),
        };

        let unread_count = ctx
            .db
            .admin("messages")
            .eq("is_read", false)
            .count()
            .await
            .unwrap_or(0);

        return Ok(Response::json(
            StatusCode::OK,
            json!({
                "success": true,
                "data": rows,
                "count": rows.len(),
                "unreadCount": unread_count,
            }),
        ));
    }

    if req.method() == Method::POST {
        let body = match json_body(&req) {
            Ok(body) => body,
            Err(response) => return Ok(response),
        };

        let name = body.get("name").and_then(Value::as_str).unwrap_or_default();
        let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
        let message = body.get("message").and_then(Value::as_str).unwrap_or_default();

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Ok(
                ApiError::bad_request("Name, email and message are required").into_response(),
            );
        }
        if !valid_email(email) {
            return Ok(ApiError::bad_request("Invalid email format").into_response());
        }

        let row = json!({
            "name": name.trim(),
            "email": email.trim().to_lowercase(),
            "subject": body.get("subject").and_then(Value::as_str).unwrap_or("").trim(),
            "message": message.trim(),
            "is_read": false,
        });

        return match ctx.db.admin("messages").insert(row).await {
            Ok(_) => Ok(Response::json(
                StatusCode::CREATED,
                json!({ "success": true, "message": "Message sent successfully" }),
            )),
            Err(error) => Ok(db_error(error, "Failed to send message")),
        };
    }

    Ok(method_not_allowed())
}

/// Same shape check the contact form applies client-side: one `@`, a dot in
/// the domain, no whitespace.
fn valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::valid_email;

    #[test]
    fn accepts_plain_addresses() {
        assert!(valid_email("visitor@example.com"));
        assert!(valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("two@@example.com"));
        assert!(!valid_email("spaces in@example.com"));
        assert!(!valid_email("nodot@example"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("user@.com"));
    }
}
