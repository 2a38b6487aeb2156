use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";
pub const DEFAULT_PUBLIC_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_SUPABASE_URL: &str = "http://localhost:54321";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {key} is not a valid http(s) URL: {value}")]
    InvalidUrl { key: &'static str, value: String },

    #[error("invalid configuration: {key}={value} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub identity: IdentityConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// How proxy routes treat the inbound credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Only require the `Authorization` header; the backend verifies it.
    Presence,
    /// Verify the token against the identity provider before forwarding.
    Verify,
}

impl AuthMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "presence" | "presence-only" => Some(AuthMode::Presence),
            "verify" | "full" => Some(AuthMode::Verify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub auth_mode: AuthMode,
    pub expose_error_details: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Dedicated backend base (`BACKEND_URL`)
    pub base_url: Url,
    /// Generic public API base (`PUBLIC_API_URL`), already carries the `/api` prefix
    pub public_url: Url,
    pub timeout_secs: Option<u64>,
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub url: Url,
    /// Public key used for session-scoped calls on behalf of a user token
    pub anon_key: String,
    /// Admin key; only needed for admin lookups
    #[serde(skip_serializing)]
    pub service_role_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Start from the environment preset, then apply specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Some(v) = env::var("RENTHIVE_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: v.clone(),
                reason: "expected a port number",
            })?;
        }
        if let Ok(v) = env::var("GATEWAY_AUTH_MODE") {
            self.server.auth_mode = AuthMode::parse(&v).ok_or(ConfigError::Invalid {
                key: "GATEWAY_AUTH_MODE",
                value: v.clone(),
                reason: "expected `presence` or `verify`",
            })?;
        }
        if let Ok(v) = env::var("EXPOSE_ERROR_DETAILS") {
            self.server.expose_error_details = parse_flag("EXPOSE_ERROR_DETAILS", &v)?;
        }

        // Backend overrides
        if let Ok(v) = env::var("BACKEND_URL") {
            self.backend.base_url = parse_base_url("BACKEND_URL", &v)?;
        }
        if let Ok(v) = env::var("PUBLIC_API_URL") {
            self.backend.public_url = parse_base_url("PUBLIC_API_URL", &v)?;
        }
        if let Ok(v) = env::var("BACKEND_TIMEOUT_SECS") {
            let secs: u64 = v.parse().map_err(|_| ConfigError::Invalid {
                key: "BACKEND_TIMEOUT_SECS",
                value: v.clone(),
                reason: "expected whole seconds",
            })?;
            // 0 keeps the default of no timeout
            self.backend.timeout_secs = (secs > 0).then_some(secs);
        }

        // Identity provider overrides
        if let Ok(v) = env::var("SUPABASE_URL") {
            self.identity.url = parse_base_url("SUPABASE_URL", &v)?;
        }
        if let Ok(v) = env::var("SUPABASE_ANON_KEY") {
            self.identity.anon_key = v;
        }
        if let Ok(v) = env::var("SUPABASE_SERVICE_ROLE_KEY") {
            self.identity.service_role_key = Some(v).filter(|k| !k.is_empty());
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = parse_flag("SECURITY_ENABLE_CORS", &v)?;
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                auth_mode: AuthMode::Presence,
                expose_error_details: true,
            },
            backend: BackendConfig::local(),
            identity: IdentityConfig::local(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                auth_mode: AuthMode::Presence,
                expose_error_details: true,
            },
            backend: BackendConfig::local(),
            identity: IdentityConfig::local(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.renthive.app".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                auth_mode: AuthMode::Presence,
                expose_error_details: false,
            },
            backend: BackendConfig::local(),
            identity: IdentityConfig::local(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://renthive.app".to_string()],
            },
        }
    }
}

impl BackendConfig {
    fn local() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
            public_url: Url::parse(DEFAULT_PUBLIC_API_URL).expect("default public URL is valid"),
            timeout_secs: None,
        }
    }
}

impl IdentityConfig {
    fn local() -> Self {
        Self {
            url: Url::parse(DEFAULT_SUPABASE_URL).expect("default Supabase URL is valid"),
            anon_key: String::new(),
            service_role_key: None,
        }
    }
}

/// Boolean env flag: `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`.
pub fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected true/false, 1/0, yes/no or on/off",
        }),
    }
}

/// Parse a base URL, rejecting schemes the proxy cannot append paths to.
pub fn parse_base_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        key,
        value: value.to_string(),
    };
    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}
