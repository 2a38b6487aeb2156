pub mod validator;

use axum::http::{header, HeaderMap, HeaderValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub use validator::{SupabaseAuth, TokenValidator, ValidationError};

/// Scheme prefix required by the full-validation gate. Case-sensitive, one space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// User record resolved from a bearer token by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub aud: Option<String>,
    #[serde(default)]
    pub app_metadata: Value,
    #[serde(default)]
    pub user_metadata: Value,
    pub created_at: Option<DateTime<Utc>>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

/// The inbound `Authorization` header, kept as raw bytes so it can be
/// forwarded exactly as received.
#[derive(Clone)]
pub struct Credential(HeaderValue);

impl Credential {
    /// Presence check only: any non-empty `Authorization` header qualifies.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(header::AUTHORIZATION)
            .filter(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace))
            .cloned()
            .map(Credential)
    }

    /// The token after an exact `Bearer ` prefix, if the header has one.
    pub fn bearer_token(&self) -> Option<&str> {
        let token = self.0.to_str().ok()?.strip_prefix(BEARER_PREFIX)?;
        if token.trim().is_empty() {
            return None;
        }
        Some(token)
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
