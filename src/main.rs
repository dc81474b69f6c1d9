use std::sync::Arc;

use portfolio_api_rust::auth::SupabaseVerifier;
use portfolio_api_rust::config;
use portfolio_api_rust::database::Database;
use portfolio_api_rust::gateway::cors::CorsPolicy;
use portfolio_api_rust::gateway::{app, Gateway};
use portfolio_api_rust::handlers;
use portfolio_api_rust::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up SUPABASE_URL and friends
    let _ = dotenvy::dotenv();

    let config = config::config();
    tracing_subscriber::fmt::init();
    tracing::info!("Starting portfolio API in {:?} mode", config.environment);

    let state = Arc::new(AppState {
        config,
        db: Database::from_config(&config.supabase),
        verifier: Arc::new(SupabaseVerifier::from_config(&config.supabase)),
    });

    let gateway = Arc::new(Gateway::new(
        handlers::routes(),
        CorsPolicy::from_config(&config.security),
        state,
    ));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("portfolio API listening on http://{}", bind_addr);

    axum::serve(listener, app(gateway)).await.expect("server");
}
