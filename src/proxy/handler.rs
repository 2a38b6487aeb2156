use std::collections::HashMap;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Uri},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{on, MethodRouter},
    Router,
};
use serde_json::{json, Value};

use super::fields::{check_body, check_query, QueryParams};
use super::forward::normalize;
use super::template::{render, TemplateError};
use super::{HttpMethod, ProxyRoute, Target};
use crate::auth::Credential;
use crate::config::AuthMode;
use crate::error::ApiError;
use crate::middleware::auth::{require_credential, verify_credential, AUTHENTICATION_REQUIRED};
use crate::state::AppState;

/// One axum route per table entry, each behind the configured credential gate.
pub fn router(state: &AppState) -> Router<AppState> {
    state.routes.iter().fold(Router::new(), |router, route| {
        router.route(route.path, method_router(route, state))
    })
}

fn method_router(route: &'static ProxyRoute, state: &AppState) -> MethodRouter<AppState> {
    let handler = move |State(state): State<AppState>,
                        params: Option<Path<HashMap<String, String>>>,
                        uri: Uri,
                        headers: HeaderMap,
                        body: Bytes| async move {
        let params = params.map(|Path(params)| params).unwrap_or_default();
        forward(route, &state, &params, &uri, &headers, &body).await
    };

    let method_router = on(route.method.filter(), handler);
    if !route.requires_credential {
        return method_router;
    }

    match state.config.server.auth_mode {
        AuthMode::Presence => method_router.route_layer(from_fn(require_credential)),
        AuthMode::Verify => {
            method_router.route_layer(from_fn_with_state(state.clone(), verify_credential))
        }
    }
}

/// Run one proxied request end to end. Never fails: every error becomes
/// the JSON error envelope.
pub async fn forward(
    route: &'static ProxyRoute,
    state: &AppState,
    params: &HashMap<String, String>,
    uri: &Uri,
    headers: &HeaderMap,
    body: &Bytes,
) -> Response {
    let started = Instant::now();
    let result = proxy(route, state, params, uri, headers, body).await;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(response) => {
            tracing::info!(
                route = route.name,
                status = response.status().as_u16(),
                elapsed_ms,
                "request proxied"
            );
            response
        }
        Err(err) => {
            let status = err.status_code();
            match &err {
                ApiError::InternalServerError { error, .. } => {
                    tracing::error!(route = route.name, elapsed_ms, error = %error, "proxy failed")
                }
                ApiError::Backend { .. } => tracing::info!(
                    route = route.name,
                    status = status.as_u16(),
                    elapsed_ms,
                    "backend rejected request"
                ),
                _ => tracing::debug!(
                    route = route.name,
                    status = status.as_u16(),
                    error = %err,
                    "request rejected before forwarding"
                ),
            }
            err.into_response()
        }
    }
}

async fn proxy(
    route: &'static ProxyRoute,
    state: &AppState,
    params: &HashMap<String, String>,
    uri: &Uri,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<Response, ApiError> {
    let expose = state.expose_error_details();

    let credential = Credential::from_headers(headers);
    if route.requires_credential && credential.is_none() {
        return Err(ApiError::unauthorized(AUTHENTICATION_REQUIRED));
    }

    let query = QueryParams::parse(uri.query());
    let body = parse_body(body)?;
    check_body(route.body, body.as_ref(), route.missing_message)?;
    check_query(route.query, &query, route.missing_message)?;

    let template = select_template(route, &query)?;
    let target = render(template, params, &query).map_err(|e| match e {
        TemplateError::InvalidSegment(_) => ApiError::bad_request(e.to_string()),
        _ => ApiError::internal(&e, expose),
    })?;

    let raw_query = if route.forward_query { uri.query() } else { None };
    let url = target.to_url(state.backend.base_for(route.backend), raw_query);
    let outbound = outbound_body(route.method, body);

    tracing::debug!(
        route = route.name,
        method = route.method.as_str(),
        target = url.path(),
        "forwarding to backend"
    );

    let response = state
        .backend
        .send(route.method, url, credential.as_ref(), outbound.as_ref())
        .await
        .map_err(|e| ApiError::internal(&e, expose))?;

    normalize(route.relay, response, expose).await
}

fn parse_body(body: &Bytes) -> Result<Option<Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|_| ApiError::invalid_json("Request body must be valid JSON"))
}

/// The template to render; `FirstOf` picks the first candidate whose key
/// is present in the query.
fn select_template(route: &ProxyRoute, query: &QueryParams) -> Result<&'static str, ApiError> {
    match route.target {
        Target::Path(template) => Ok(template),
        Target::FirstOf(candidates) => candidates
            .iter()
            .find(|(key, _)| query.get(key).is_some())
            .map(|(_, template)| *template)
            .ok_or_else(|| {
                let keys: Vec<&str> = candidates.iter().map(|(key, _)| *key).collect();
                ApiError::validation_error(
                    route
                        .missing_message
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("One of {} is required", keys.join(", "))),
                )
            }),
    }
}

fn outbound_body(method: HttpMethod, body: Option<Value>) -> Option<Value> {
    match method {
        HttpMethod::Get => None,
        m if m.requires_body() => Some(body.unwrap_or_else(|| json!({}))),
        _ => body,
    }
}
