pub mod adapter;
pub mod cors;
pub mod request;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::extract::Request as NativeRequest;
use axum::http::{Method, StatusCode};
use axum::response::Response as NativeResponse;
use axum::Router;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::state::Ctx;

use self::cors::CorsPolicy;
use self::response::Response;
use self::routes::{Dispatch, HandlerFuture, RouteTable};

/// Single entry point multiplexing every resource handler.
///
/// One instance per process; the route table and allow-list are read-only
/// after construction, so concurrent requests share it freely.
pub struct Gateway {
    routes: RouteTable,
    cors: CorsPolicy,
    state: Ctx,
    max_body_bytes: usize,
}

impl Gateway {
    pub fn new(routes: RouteTable, cors: CorsPolicy, state: Ctx) -> Self {
        let max_body_bytes = state.config.api.max_request_size_bytes;
        Self {
            routes,
            cors,
            state,
            max_body_bytes,
        }
    }

    /// Adapt, short-circuit preflight, dispatch, convert handler failure to
    /// a 500, re-apply dynamic CORS, serialize.
    pub async fn handle(&self, native: NativeRequest) -> NativeResponse {
        let request = adapter::normalize(native, self.max_body_bytes).await;

        if *request.method() == Method::OPTIONS {
            return adapter::into_native(CorsPolicy::preflight());
        }

        // The request moves into the handler; keep what the tail end needs.
        let origin = request.origin().map(str::to_owned);
        let path = request.path().to_owned();

        let mut response = match self.routes.resolve(&path) {
            Dispatch::Exact(handler) => {
                self.invoke(&path, handler.call(self.state.clone(), request))
                    .await
            }
            Dispatch::Pattern(handler, id) => {
                self.invoke(&path, handler.call(self.state.clone(), request, id))
                    .await
            }
            Dispatch::NotFound => {
                tracing::debug!(%path, "no route matched");
                Response::json(
                    StatusCode::NOT_FOUND,
                    json!({ "error": "Not Found", "path": path }),
                )
            }
        };

        self.cors.apply(origin.as_deref(), &mut response);
        adapter::into_native(response)
    }

    /// The one try/catch boundary in the core: an `Err` from a handler
    /// becomes a generic 500 and the gateway keeps serving.
    async fn invoke(&self, path: &str, fut: HandlerFuture) -> Response {
        match fut.await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(%path, error = ?error, "handler failed");
                Response::json(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Internal Server Error",
                        "message": error.to_string(),
                    }),
                )
            }
        }
    }
}

/// Mount the gateway as the router's fallback so every path funnels through
/// the single entry point.
pub fn app(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .fallback(move |native: NativeRequest| {
            let gateway = gateway.clone();
            async move { gateway.handle(native).await }
        })
        .layer(TraceLayer::new_for_http())
}
