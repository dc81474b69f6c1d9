pub mod session;
pub mod supabase;

use async_trait::async_trait;
use uuid::Uuid;

use crate::gateway::request::Request;

pub use self::supabase::SupabaseVerifier;

/// Authenticated identity produced by a successful verification. Exists only
/// for the duration of one request's authorization decision.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Checks an opaque bearer credential against the identity provider.
///
/// Every failure mode (malformed token, expired token, provider unreachable)
/// collapses to `None`; the distinction is logged, not surfaced, because the
/// callers only need a boolean gate.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Option<Principal>;
}

/// Token from the Authorization header, if it uses the Bearer scheme.
pub fn bearer_token(request: &Request) -> Option<&str> {
    let value = request.header("authorization")?;
    let token = value.strip_prefix("Bearer ")?;
    if token.trim().is_empty() {
        return None;
    }
    Some(token)
}

pub async fn authenticated_user(
    verifier: &dyn IdentityVerifier,
    request: &Request,
) -> Option<Principal> {
    let token = bearer_token(request)?;
    verifier.verify(token).await
}

pub async fn is_authenticated(verifier: &dyn IdentityVerifier, request: &Request) -> bool {
    authenticated_user(verifier, request).await.is_some()
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, Method};
    use url::Url;

    use super::*;
    use crate::gateway::request::Body;

    fn request_with_auth(value: Option<&str>) -> Request {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        }
        Request::new(
            Method::GET,
            Url::parse("http://localhost/api/projects").unwrap(),
            headers,
            Body::Absent,
        )
    }

    #[test]
    fn extracts_bearer_token() {
        let request = request_with_auth(Some("Bearer abc123"));
        assert_eq!(bearer_token(&request), Some("abc123"));
    }

    #[test]
    fn missing_header_yields_none() {
        assert_eq!(bearer_token(&request_with_auth(None)), None);
    }

    #[test]
    fn non_bearer_scheme_yields_none() {
        let request = request_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&request), None);
    }

    #[test]
    fn empty_token_yields_none() {
        let request = request_with_auth(Some("Bearer "));
        assert_eq!(bearer_token(&request), None);
    }
}
