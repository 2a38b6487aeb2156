// Handlers the gateway answers itself; everything under the proxy table
// lives in `crate::proxy`.
pub mod session;

pub use session::session;

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - service info and the registered proxy routes
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let routes: Vec<Value> = state.routes.iter().map(|route| route.summary()).collect();

    Json(json!({
        "success": true,
        "data": {
            "name": "RentHive Gateway",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Authenticated proxy routes in front of the RentHive backend",
            "environment": state.config.environment.as_str(),
            "auth_mode": state.config.server.auth_mode,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "session": "/api/auth/session (bearer token, validated)",
            },
            "routes": routes,
        }
    }))
}

/// GET /health - liveness only; the backend is not probed
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "environment": state.config.environment.as_str(),
    })))
}
