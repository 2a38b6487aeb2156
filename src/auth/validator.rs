//! Token validation against Supabase Auth.
//!
//! `TokenValidator::validate` reports why a token did not resolve;
//! `TokenValidator::resolve` folds every failure into `None` for callers
//! that only care whether a live session exists.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use super::Identity;
use crate::config::IdentityConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("authentication token is empty")]
    EmptyToken,

    #[error("identity provider rejected the token (status {0})")]
    Rejected(StatusCode),

    #[error("identity provider unavailable (status {0})")]
    Unavailable(StatusCode),

    #[error("identity provider unreachable")]
    Unreachable(#[source] reqwest::Error),

    #[error("identity provider returned an unreadable user record")]
    Malformed(#[source] reqwest::Error),

    #[error("identity provider is not configured: {0}")]
    Misconfigured(&'static str),
}

impl ValidationError {
    /// The token itself was bad, as opposed to the provider being unusable.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ValidationError::EmptyToken | ValidationError::Rejected(_))
    }

    /// A fault on this side that no token could have avoided.
    pub fn is_local_fault(&self) -> bool {
        matches!(self, ValidationError::Misconfigured(_))
    }
}

#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<Identity, ValidationError>;

    /// `Some(identity)` for a live session, `None` for anything else.
    async fn resolve(&self, token: &str) -> Option<Identity> {
        match self.validate(token).await {
            Ok(identity) => Some(identity),
            Err(e) if e.is_rejection() => {
                tracing::debug!(error = %e, "token did not resolve to a user");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "token validation failed on the provider side");
                None
            }
        }
    }
}

/// Supabase Auth (GoTrue) client.
#[derive(Clone)]
pub struct SupabaseAuth {
    http: Client,
    base_url: Url,
    anon_key: String,
    service_role_key: Option<String>,
}

impl SupabaseAuth {
    pub fn new(http: Client, config: &IdentityConfig) -> Self {
        Self {
            http,
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ValidationError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ValidationError::Misconfigured("SUPABASE_URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["auth", "v1"])
            .extend(segments);
        Ok(url)
    }

    /// Fetch any user by id through the admin API. Needs the service-role key.
    pub async fn admin_user(&self, id: Uuid) -> Result<Identity, ValidationError> {
        let key = self
            .service_role_key
            .as_deref()
            .ok_or(ValidationError::Misconfigured("SUPABASE_SERVICE_ROLE_KEY is not set"))?;
        let id = id.to_string();
        let url = self.endpoint(&["admin", "users", &id])?;

        self.fetch_user(url, key, key).await
    }

    async fn fetch_user(
        &self,
        url: Url,
        api_key: &str,
        bearer: &str,
    ) -> Result<Identity, ValidationError> {
        let response = self
            .http
            .get(url)
            .header("apikey", api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "identity provider request failed");
                ValidationError::Unreachable(e)
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<Identity>().await.map_err(|e| {
                tracing::warn!(error = %e, "identity provider returned an unreadable user");
                ValidationError::Malformed(e)
            });
        }

        match status {
            StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::NOT_FOUND
            | StatusCode::UNPROCESSABLE_ENTITY => Err(ValidationError::Rejected(status)),
            _ => {
                tracing::warn!(status = %status, "identity provider unavailable");
                Err(ValidationError::Unavailable(status))
            }
        }
    }
}

#[async_trait]
impl TokenValidator for SupabaseAuth {
    async fn validate(&self, token: &str) -> Result<Identity, ValidationError> {
        if token.trim().is_empty() {
            return Err(ValidationError::EmptyToken);
        }
        if self.anon_key.is_empty() {
            return Err(ValidationError::Misconfigured("SUPABASE_ANON_KEY is not set"));
        }

        let url = self.endpoint(&["user"])?;
        self.fetch_user(url, &self.anon_key, token).await
    }
}
