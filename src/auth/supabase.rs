use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::SupabaseConfig;

use super::{IdentityVerifier, Principal};

/// Verifies bearer tokens against Supabase Auth's user endpoint.
pub struct SupabaseVerifier {
    http: reqwest::Client,
    user_endpoint: String,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
    role: Option<String>,
}

impl SupabaseVerifier {
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            user_endpoint: format!("{}/auth/v1/user", url.trim_end_matches('/')),
            anon_key: anon_key.to_owned(),
        }
    }

    pub fn from_config(supabase: &SupabaseConfig) -> Self {
        Self::new(&supabase.url, &supabase.anon_key)
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseVerifier {
    async fn verify(&self, token: &str) -> Option<Principal> {
        let result = self
            .http
            .get(&self.user_endpoint)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(error = %error, "identity provider unreachable");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "token verification rejected");
            return None;
        }

        match response.json::<AuthUser>().await {
            Ok(user) => Some(Principal {
                id: user.id,
                email: user.email,
                role: user.role,
            }),
            Err(error) => {
                tracing::warn!(error = %error, "unexpected identity provider payload");
                None
            }
        }
    }
}
