use once_cell::sync::Lazy;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub supabase: SupabaseConfig,
    pub security: SecurityConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Hosted database + identity provider endpoints and keys.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub service_key: String,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    pub frontend_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let port = env::var("PORTFOLIO_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let max_request_size_bytes = env::var("API_MAX_REQUEST_SIZE_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2 * 1024 * 1024);

        Self {
            environment,
            server: ServerConfig { port },
            supabase: SupabaseConfig {
                url: env::var("SUPABASE_URL").unwrap_or_default(),
                anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
                service_key: env::var("SUPABASE_SERVICE_KEY").unwrap_or_default(),
            },
            security: SecurityConfig {
                cors_origins,
                frontend_url: env::var("FRONTEND_URL").ok(),
            },
            api: ApiConfig {
                max_request_size_bytes,
            },
        }
    }
}

static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// Process-wide configuration singleton, loaded once from the environment.
pub fn config() -> &'static AppConfig {
    &CONFIG
}
