use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{Credential, Identity};
use crate::error::ApiError;
use crate::state::AppState;

pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";
pub const TOKEN_REQUIRED: &str = "Authentication token is required";
pub const TOKEN_INVALID: &str = "Invalid or expired authentication token";

/// Presence-only gate: the request must carry an `Authorization` header.
/// Whether the token is any good is left to the backend, which sees the
/// same header on the forwarded call.
pub async fn require_credential(request: Request, next: Next) -> Result<Response, ApiError> {
    if Credential::from_headers(request.headers()).is_none() {
        tracing::debug!(path = %request.uri().path(), "rejecting request without credential");
        return Err(ApiError::unauthorized(AUTHENTICATION_REQUIRED));
    }

    Ok(next.run(request).await)
}

/// Full-validation gate: resolve the bearer token with the identity
/// provider and attach the resulting `Identity` to the request.
pub async fn verify_credential(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = Credential::from_headers(request.headers())
        .ok_or_else(|| ApiError::unauthorized(TOKEN_REQUIRED))?;

    let identity = authenticate(&state, &credential).await?;

    tracing::debug!(user_id = %identity.id, "request authenticated");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

async fn authenticate(state: &AppState, credential: &Credential) -> Result<Identity, ApiError> {
    let token = credential
        .bearer_token()
        .ok_or_else(|| ApiError::unauthorized(TOKEN_REQUIRED))?;

    match state.validator.validate(token).await {
        Ok(identity) => Ok(identity),
        Err(e) if e.is_local_fault() => {
            tracing::error!(error = %e, "token validation could not run");
            Err(ApiError::auth_server_error(e.to_string()))
        }
        Err(e) => {
            if e.is_rejection() {
                tracing::debug!(error = %e, "token rejected");
            } else {
                tracing::warn!(error = %e, "token validation failed, treating as invalid");
            }
            Err(ApiError::unauthorized(TOKEN_INVALID))
        }
    }
}
