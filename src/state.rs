use std::sync::Arc;

use reqwest::Client;

use crate::auth::{SupabaseAuth, TokenValidator};
use crate::config::AppConfig;
use crate::proxy::{BackendClient, ProxyRoute, ROUTES};

/// Everything a request handler needs, built once at startup and cloned
/// cheaply into each request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: BackendClient,
    pub validator: Arc<dyn TokenValidator>,
    pub routes: &'static [ProxyRoute],
}

impl AppState {
    /// Wire the production collaborators: Supabase for tokens, the
    /// configured backend for proxying.
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let http = http_client()?;
        let validator = Arc::new(SupabaseAuth::new(http.clone(), &config.identity));
        Ok(Self::with_validator(config, http, validator))
    }

    pub fn with_validator(
        config: AppConfig,
        http: Client,
        validator: Arc<dyn TokenValidator>,
    ) -> Self {
        Self {
            backend: BackendClient::new(http, &config.backend),
            config: Arc::new(config),
            validator,
            routes: ROUTES,
        }
    }

    pub fn expose_error_details(&self) -> bool {
        self.config.server.expose_error_details
    }
}

/// Shared outbound client. No client-wide timeout; the backend timeout is
/// applied per request when configured.
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("renthive-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
}
