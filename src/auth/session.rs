//! Deprecated cookie-session verification, kept as a fallback for the legacy
//! login/logout endpoints that predate bearer-token auth.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::database::{Database, DatabaseError};

pub const SESSION_COOKIE_NAME: &str = "admin_session";
const SESSION_TABLE: &str = "admin_sessions";

/// Parse a Cookie header into name/value pairs.
pub fn parse_cookies(header: Option<&str>) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    let Some(header) = header else {
        return cookies;
    };
    for pair in header.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            cookies.insert(name.trim().to_owned(), value.trim().to_owned());
        }
    }
    cookies
}

/// Look the token up in the stored-session table and reject it if expired.
pub async fn verify_session(db: &Database, token: &str) -> Option<Value> {
    let row = match db.admin(SESSION_TABLE).eq("token", token).select_optional().await {
        Ok(row) => row?,
        Err(error) => {
            tracing::warn!(error = %error, "session lookup failed");
            return None;
        }
    };

    let expires_at = row
        .get("expires_at")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))?;

    if expires_at <= Utc::now() {
        tracing::debug!("session token expired");
        return None;
    }
    Some(row)
}

pub async fn delete_session(db: &Database, token: &str) -> Result<(), DatabaseError> {
    db.admin(SESSION_TABLE).eq("token", token).delete().await
}

/// Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    format!(
        "{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_cookies() {
        let cookies = parse_cookies(Some("a=1; admin_session=tok3n; b=2"));
        assert_eq!(cookies.get("admin_session").map(String::as_str), Some("tok3n"));
        assert_eq!(cookies.len(), 3);
    }

    #[test]
    fn missing_header_is_empty() {
        assert!(parse_cookies(None).is_empty());
    }

    #[test]
    fn malformed_pairs_are_skipped() {
        let cookies = parse_cookies(Some("no-equals-sign; a=1"));
        assert_eq!(cookies.len(), 1);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie();
        assert!(cookie.starts_with("admin_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
