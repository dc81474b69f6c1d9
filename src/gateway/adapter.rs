use axum::body::{Body as NativeBody, Bytes};
use axum::extract::Request as NativeRequest;
use axum::http::{header, HeaderMap, Method, Uri};
use axum::response::Response as NativeResponse;
use futures::StreamExt;
use once_cell::sync::Lazy;
use url::Url;

use super::request::{Body, Request};
use super::response::Response;

/// Host used when the native layer supplies neither a full URL nor a Host
/// header. Keeps downstream path/query parsing uniform.
const DEFAULT_HOST: &str = "localhost";

static FALLBACK_URL: Lazy<Url> =
    Lazy::new(|| Url::parse("http://localhost/").expect("static fallback URL"));

/// Adapt a platform-native request into the normalized `Request`.
///
/// Never fails: a body that cannot be read or decoded degrades to
/// `Body::Raw`/`Body::Absent` and the handler decides what to do with it.
pub async fn normalize(native: NativeRequest, max_body_bytes: usize) -> Request {
    let (parts, body) = native.into_parts();
    let url = absolute_url(&parts.headers, &parts.uri);
    let body = if admits_body(&parts.method) {
        normalize_body(read_body(body, max_body_bytes).await)
    } else {
        Body::Absent
    };
    Request::new(parts.method, url, parts.headers, body)
}

/// Serialize the normalized `Response` back to the platform. The body is
/// already fully buffered, so the write completes in one piece.
pub fn into_native(response: Response) -> NativeResponse {
    let (status, headers, body) = response.into_parts();
    let mut native = NativeResponse::new(NativeBody::from(body));
    *native.status_mut() = status;
    *native.headers_mut() = headers;
    native
}

fn admits_body(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Buffer the body up to `limit` bytes. Over-limit and failed reads are
/// logged and yield whatever was collected so far, so the handler still sees
/// the partial payload instead of a silent empty body.
async fn read_body(body: NativeBody, limit: usize) -> Bytes {
    let mut stream = body.into_data_stream();
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                if buf.len() + chunk.len() > limit {
                    tracing::warn!(limit, "request body exceeds size limit, truncating");
                    let room = limit - buf.len();
                    buf.extend_from_slice(&chunk[..room]);
                    break;
                }
                buf.extend_from_slice(&chunk);
            }
            Err(error) => {
                tracing::warn!(error = %error, "failed to read request body");
                break;
            }
        }
    }
    Bytes::from(buf)
}

fn normalize_body(bytes: Bytes) -> Body {
    if bytes.is_empty() {
        return Body::Absent;
    }
    match serde_json::from_slice(&bytes) {
        Ok(value) => Body::Decoded(value),
        // Pass-through fallback: not JSON, hand the raw bytes to the handler.
        Err(_) => Body::Raw(bytes),
    }
}

/// Synthesize an absolute URL when the native layer only supplies a path,
/// taking the host from the request's own Host header.
fn absolute_url(headers: &HeaderMap, uri: &Uri) -> Url {
    if uri.scheme().is_some() {
        if let Ok(url) = Url::parse(&uri.to_string()) {
            return url;
        }
    }
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_HOST);
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    // A malformed Host header must not cost us the path; retry with the
    // default host before the path-less last resort.
    Url::parse(&format!("http://{host}{path_and_query}"))
        .or_else(|_| Url::parse(&format!("http://{DEFAULT_HOST}{path_and_query}")))
        .unwrap_or_else(|_| FALLBACK_URL.clone())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;

    const MAX_BODY: usize = 1024 * 1024;

    fn native(method: Method, uri: &str, body: &str) -> NativeRequest {
        NativeRequest::builder()
            .method(method)
            .uri(uri)
            .header("host", "api.example.com")
            .body(NativeBody::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn synthesizes_absolute_url_from_host_header() {
        let req = normalize(native(Method::GET, "/api/projects?featured=true", ""), MAX_BODY).await;
        assert_eq!(req.url().as_str(), "http://api.example.com/api/projects?featured=true");
        assert_eq!(req.path(), "/api/projects");
        assert_eq!(req.query("featured").as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn missing_host_falls_back_to_localhost() {
        let native = NativeRequest::builder()
            .method(Method::GET)
            .uri("/api/hero")
            .body(NativeBody::empty())
            .unwrap();
        let req = normalize(native, MAX_BODY).await;
        assert_eq!(req.url().as_str(), "http://localhost/api/hero");
    }

    #[tokio::test]
    async fn get_body_is_absent() {
        let req = normalize(native(Method::GET, "/api/projects", "ignored"), MAX_BODY).await;
        assert!(req.body().is_absent());
    }

    #[tokio::test]
    async fn json_body_is_decoded() {
        let req = normalize(
            native(Method::POST, "/api/projects/create", r#"{"name":"A","value":1}"#),
            MAX_BODY,
        )
        .await;
        assert_eq!(req.json(), Some(&json!({"name": "A", "value": 1})));
    }

    #[tokio::test]
    async fn non_json_body_passes_through_raw() {
        let req = normalize(native(Method::POST, "/api/projects/create", "not json"), MAX_BODY).await;
        let raw = req.body().as_raw().expect("raw body");
        assert_eq!(raw.as_ref(), b"not json");
    }

    #[tokio::test]
    async fn malformed_host_header_keeps_path_and_query() {
        let native = NativeRequest::builder()
            .method(Method::GET)
            .uri("/api/ping?debug=1")
            .header("host", "bad host")
            .body(NativeBody::empty())
            .unwrap();
        let req = normalize(native, MAX_BODY).await;
        assert_eq!(req.path(), "/api/ping");
        assert_eq!(req.url().host_str(), Some("localhost"));
        assert_eq!(req.query("debug").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn oversize_body_degrades_to_truncated_raw() {
        let req = normalize(native(Method::POST, "/api/projects/create", "0123456789"), 4).await;
        let raw = req.body().as_raw().expect("raw body");
        assert_eq!(raw.as_ref(), b"0123");
    }

    #[tokio::test]
    async fn empty_post_body_is_absent() {
        let req = normalize(native(Method::POST, "/api/seed", ""), MAX_BODY).await;
        assert!(req.body().is_absent());
    }

    #[test]
    fn response_round_trips_to_native() {
        let response = Response::json(StatusCode::CREATED, json!({"success": true}));
        let native = into_native(response);
        assert_eq!(native.status(), StatusCode::CREATED);
        assert_eq!(
            native.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
