pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod proxy;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Environment;
use crate::error::ApiError;
use crate::state::AppState;

/// The complete HTTP surface: service routes, the session probe, and every
/// entry of the proxy route table.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Always fully validated, regardless of the proxy auth mode
        .merge(session_routes(&state))
        // Proxied API
        .merge(proxy::router(&state))
        .fallback(fallback)
        // Global middleware
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn session_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/api/auth/session",
        get(handlers::session)
            .route_layer(from_fn_with_state(state.clone(), middleware::verify_credential)),
    )
}

async fn fallback() -> ApiError {
    ApiError::not_found("Route not found")
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let security = &state.config.security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if state.config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Bind the configured port and serve until Ctrl-C.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let bind_addr = format!("0.0.0.0:{}", state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!(
        address = %bind_addr,
        environment = state.config.environment.as_str(),
        auth_mode = ?state.config.server.auth_mode,
        backend = %state.config.backend.base_url,
        public_api = %state.config.backend.public_url,
        routes = state.routes.len(),
        "RentHive gateway listening"
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("RentHive gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
