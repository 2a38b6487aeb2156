use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::{Backend, HttpMethod, Relay};
use crate::auth::Credential;
use crate::config::BackendConfig;
use crate::error::ApiError;

/// Outbound side of the proxy: one shared `reqwest::Client` and the two
/// configured backend bases.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
    public_url: Url,
    timeout: Option<Duration>,
}

impl BackendClient {
    pub fn new(http: Client, config: &BackendConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            public_url: config.public_url.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn base_for(&self, backend: Backend) -> &Url {
        match backend {
            Backend::Dedicated => &self.base_url,
            Backend::Public => &self.public_url,
        }
    }

    /// Issue the call. The credential goes out exactly as it came in.
    pub async fn send(
        &self,
        method: HttpMethod,
        url: Url,
        credential: Option<&Credential>,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self
            .http
            .request(method.as_method(), url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CACHE_CONTROL, "no-cache");

        if let Some(credential) = credential {
            request = request.header(header::AUTHORIZATION, credential.header_value().clone());
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        request.send().await
    }
}

fn json_response(status: StatusCode, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// Turn a backend response into the client response.
///
/// - 2xx: payload relayed byte-for-byte with the same status, or the inner
///   `data` for `Relay::UnwrapData`.
/// - anything else: error envelope with the backend's status and its
///   `message`/`error` text.
/// - unreadable or non-JSON success bodies: 500.
pub async fn normalize(
    relay: Relay,
    response: reqwest::Response,
    expose_details: bool,
) -> Result<Response, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let bytes = response.bytes().await.unwrap_or_default();
        let message = error_message(&bytes)
            .unwrap_or_else(|| format!("Backend request failed with status {}", status.as_u16()));
        return Err(ApiError::backend(status, message));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::internal(&e, expose_details))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        let mut response = json_response(status, Body::empty());
        response.headers_mut().remove(header::CONTENT_TYPE);
        return Ok(response);
    }

    let payload: Value =
        serde_json::from_slice(&bytes).map_err(|e| ApiError::internal(&e, expose_details))?;

    match (relay, unwrap_data(payload)) {
        (Relay::UnwrapData, Some(data)) => {
            let mut response = (status, Json(data)).into_response();
            response
                .headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            Ok(response)
        }
        _ => Ok(json_response(status, Body::from(bytes))),
    }
}

/// `data` out of `{ "success": true, "data": ... }`, otherwise `None`.
fn unwrap_data(payload: Value) -> Option<Value> {
    match payload {
        Value::Object(mut map) if map.get("success") == Some(&Value::Bool(true)) => {
            map.remove("data")
        }
        _ => None,
    }
}

/// Human-readable message from a backend error body, if it has one.
fn error_message(bytes: &Bytes) -> Option<String> {
    let body: Value = serde_json::from_slice(bytes).ok()?;
    let text = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);

    text(&body["message"])
        .or_else(|| text(&body["error"]))
        .or_else(|| text(&body["error"]["message"]))
}
