use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::state::Ctx;

use super::request::Request;
use super::response::Response;

pub type HandlerFuture = BoxFuture<'static, anyhow::Result<Response>>;

/// Handler for an exact route. A failed future is the one error path the
/// gateway converts to a 500; everything expected is an ordinary `Response`.
#[derive(Clone)]
pub struct Handler(Arc<dyn Fn(Ctx, Request) -> HandlerFuture + Send + Sync>);

impl Handler {
    pub fn call(&self, ctx: Ctx, req: Request) -> HandlerFuture {
        (self.0)(ctx, req)
    }
}

/// Handler for a pattern route; receives the captured path segment.
#[derive(Clone)]
pub struct PatternHandler(Arc<dyn Fn(Ctx, Request, String) -> HandlerFuture + Send + Sync>);

impl PatternHandler {
    pub fn call(&self, ctx: Ctx, req: Request, id: String) -> HandlerFuture {
        (self.0)(ctx, req, id)
    }
}

pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Ctx, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Response>> + Send + 'static,
{
    Handler(Arc::new(move |ctx, req| Box::pin(f(ctx, req))))
}

pub fn pattern_handler<F, Fut>(f: F) -> PatternHandler
where
    F: Fn(Ctx, Request, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Response>> + Send + 'static,
{
    PatternHandler(Arc::new(move |ctx, req, id| Box::pin(f(ctx, req, id))))
}

/// A pattern route: a literal prefix, one opaque path segment, nothing after.
pub struct PatternRoute {
    prefix: String,
    handler: PatternHandler,
}

impl PatternRoute {
    /// Returns the captured segment when `path` is exactly
    /// `<prefix>/<segment>` with a non-empty, slash-free segment.
    fn capture<'p>(&self, path: &'p str) -> Option<&'p str> {
        let segment = path.strip_prefix(self.prefix.as_str())?.strip_prefix('/')?;
        if segment.is_empty() || segment.contains('/') {
            return None;
        }
        Some(segment)
    }
}

/// Outcome of resolving a path. A miss is a value, never an error.
pub enum Dispatch<'t> {
    Exact(&'t Handler),
    Pattern(&'t PatternHandler, String),
    NotFound,
}

/// Process-wide route table: exact paths in a map tried first, then pattern
/// routes in declaration order. Built once at startup, read-only afterwards.
///
/// Matching is on the literal path string; trailing slashes are not
/// normalized, so register a slash variant explicitly if one is ever needed.
#[derive(Default)]
pub struct RouteTable {
    exact: HashMap<String, Handler>,
    patterns: Vec<PatternRoute>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, handler: Handler) -> Self {
        let previous = self.exact.insert(path.to_owned(), handler);
        debug_assert!(previous.is_none(), "duplicate exact route: {path}");
        self
    }

    pub fn pattern(mut self, prefix: &str, handler: PatternHandler) -> Self {
        self.patterns.push(PatternRoute {
            prefix: prefix.to_owned(),
            handler,
        });
        self
    }

    /// Exact lookup first; otherwise the first matching pattern wins.
    pub fn resolve(&self, path: &str) -> Dispatch<'_> {
        if let Some(handler) = self.exact.get(path) {
            return Dispatch::Exact(handler);
        }
        for route in &self.patterns {
            if let Some(segment) = route.capture(path) {
                return Dispatch::Pattern(&route.handler, segment.to_owned());
            }
        }
        Dispatch::NotFound
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    async fn noop_handler(_ctx: Ctx, _req: Request) -> anyhow::Result<Response> {
        Ok(Response::empty(StatusCode::OK))
    }

    async fn noop_id_handler(_ctx: Ctx, _req: Request, _id: String) -> anyhow::Result<Response> {
        Ok(Response::empty(StatusCode::OK))
    }

    fn table() -> RouteTable {
        RouteTable::new()
            .route("/api/projects", handler(noop_handler))
            .route("/api/projects/config", handler(noop_handler))
            .pattern("/api/projects", pattern_handler(noop_id_handler))
            .pattern("/api/messages", pattern_handler(noop_id_handler))
    }

    #[test]
    fn exact_match_wins_over_pattern() {
        // "/api/projects/config" also matches the projects pattern
        assert!(matches!(
            table().resolve("/api/projects/config"),
            Dispatch::Exact(_)
        ));
    }

    #[test]
    fn pattern_captures_single_segment() {
        match table().resolve("/api/projects/42") {
            Dispatch::Pattern(_, id) => assert_eq!(id, "42"),
            _ => panic!("expected pattern match"),
        }
    }

    #[test]
    fn pattern_rejects_nested_segments() {
        assert!(matches!(
            table().resolve("/api/projects/42/extra"),
            Dispatch::NotFound
        ));
    }

    #[test]
    fn pattern_rejects_empty_segment() {
        assert!(matches!(
            table().resolve("/api/messages/"),
            Dispatch::NotFound
        ));
    }

    #[test]
    fn pattern_requires_segment_boundary() {
        assert!(matches!(
            table().resolve("/api/projectsfoo/42"),
            Dispatch::NotFound
        ));
    }

    #[test]
    fn trailing_slash_is_not_normalized() {
        assert!(matches!(
            table().resolve("/api/projects/"),
            Dispatch::NotFound
        ));
    }

    #[test]
    fn unknown_path_is_not_found() {
        assert!(matches!(table().resolve("/api/nope"), Dispatch::NotFound));
    }

    #[test]
    fn first_declared_pattern_wins() {
        let table = RouteTable::new()
            .pattern("/api/things", pattern_handler(noop_id_handler))
            .pattern("/api/things", pattern_handler(noop_id_handler));
        // Both patterns match; declaration order decides.
        match table.resolve("/api/things/1") {
            Dispatch::Pattern(_, id) => assert_eq!(id, "1"),
            _ => panic!("expected pattern match"),
        }
    }
}
