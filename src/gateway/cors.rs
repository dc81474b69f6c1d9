use axum::http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::StatusCode;

use crate::config::SecurityConfig;

use super::response::Response;

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Per-request CORS decision, derived from the Origin header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsDecision {
    pub allow_origin: Option<String>,
    pub allow_credentials: bool,
}

/// Origin allow-list for credentialed cross-origin responses.
///
/// Preflight answers are static and permissive; real responses only ever echo
/// a specific allow-listed origin, never `*`, because browsers reject the
/// wildcard when credentials are in play.
pub struct CorsPolicy {
    origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new(origins: Vec<String>) -> Self {
        Self { origins }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        let mut origins = security.cors_origins.clone();
        if let Some(frontend) = &security.frontend_url {
            origins.push(frontend.clone());
        }
        Self::new(origins)
    }

    /// Allowed: any-port localhost, Vercel deployment subdomains, and the
    /// configured origins.
    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        if let Some(port) = origin.strip_prefix("http://localhost:") {
            if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
                return true;
            }
        }
        if origin.ends_with(".vercel.app") {
            return true;
        }
        self.origins.iter().any(|allowed| allowed == origin)
    }

    pub fn decide(&self, origin: Option<&str>) -> CorsDecision {
        match origin {
            Some(origin) if self.is_allowed_origin(origin) => CorsDecision {
                allow_origin: Some(origin.to_owned()),
                allow_credentials: true,
            },
            _ => CorsDecision {
                allow_origin: None,
                allow_credentials: false,
            },
        }
    }

    /// Attach dynamic CORS headers to a real (non-preflight) response.
    /// No match means no headers; the browser blocking the response
    /// client-side is the intended outcome, not a failure.
    pub fn apply(&self, origin: Option<&str>, response: &mut Response) {
        let decision = self.decide(origin);
        if let Some(origin) = decision.allow_origin {
            if let Ok(value) = HeaderValue::from_str(&origin) {
                response.insert_header(ACCESS_CONTROL_ALLOW_ORIGIN, value);
                response.insert_header(
                    ACCESS_CONTROL_ALLOW_CREDENTIALS,
                    HeaderValue::from_static("true"),
                );
            }
        }
    }

    /// Static permissive answer for OPTIONS preflight. Used only for
    /// preflight, never for the credentialed real-response path.
    pub fn preflight() -> Response {
        Response::empty(StatusCode::NO_CONTENT)
            .with_header(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))
            .with_header(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            )
            .with_header(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            )
            .with_header(
                ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::new(vec!["https://portfolio.example.com".to_string()])
    }

    #[test]
    fn localhost_any_port_is_allowed() {
        assert!(policy().is_allowed_origin("http://localhost:5173"));
        assert!(policy().is_allowed_origin("http://localhost:3000"));
    }

    #[test]
    fn localhost_without_numeric_port_is_rejected() {
        assert!(!policy().is_allowed_origin("http://localhost:"));
        assert!(!policy().is_allowed_origin("http://localhost:abc"));
    }

    #[test]
    fn vercel_subdomains_are_allowed() {
        assert!(policy().is_allowed_origin("https://my-site.vercel.app"));
    }

    #[test]
    fn configured_origin_is_allowed() {
        assert!(policy().is_allowed_origin("https://portfolio.example.com"));
    }

    #[test]
    fn unknown_origin_is_rejected() {
        assert!(!policy().is_allowed_origin("https://evil.example.com"));
    }

    #[test]
    fn decision_echoes_specific_origin() {
        let decision = policy().decide(Some("https://portfolio.example.com"));
        assert_eq!(
            decision.allow_origin.as_deref(),
            Some("https://portfolio.example.com")
        );
        assert!(decision.allow_credentials);
    }

    #[test]
    fn missing_origin_gets_no_headers() {
        let decision = policy().decide(None);
        assert_eq!(decision.allow_origin, None);
        assert!(!decision.allow_credentials);
    }

    #[test]
    fn preflight_is_static_and_bodyless() {
        let response = CorsPolicy::preflight();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.body().is_empty());
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
