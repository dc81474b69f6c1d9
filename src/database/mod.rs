pub mod query;

pub use self::query::TableQuery;

use thiserror::Error;

use crate::config::SupabaseConfig;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("database request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("database rejected request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("row not found")]
    NotFound,
}

/// Client for the hosted database's REST interface (PostgREST).
///
/// Two roles, mirroring the upstream service: the anon key for public reads
/// and the service key for admin writes. The service key falls back to the
/// anon key when not configured.
#[derive(Clone)]
pub struct Database {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
    service_key: String,
}

impl Database {
    pub fn new(url: &str, anon_key: &str, service_key: &str) -> Self {
        let service_key = if service_key.is_empty() {
            anon_key
        } else {
            service_key
        };
        Self {
            http: reqwest::Client::new(),
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            anon_key: anon_key.to_owned(),
            service_key: service_key.to_owned(),
        }
    }

    pub fn from_config(supabase: &SupabaseConfig) -> Self {
        Self::new(&supabase.url, &supabase.anon_key, &supabase.service_key)
    }

    /// Query a table with the public (anon) role.
    pub fn public(&self, table: &str) -> TableQuery {
        TableQuery::new(
            self.http.clone(),
            &self.rest_url,
            table,
            self.anon_key.clone(),
        )
    }

    /// Query a table with the service role.
    pub fn admin(&self, table: &str) -> TableQuery {
        TableQuery::new(
            self.http.clone(),
            &self.rest_url,
            table,
            self.service_key.clone(),
        )
    }
}
