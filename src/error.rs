// HTTP API Error Types
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

pub const AUTH_SERVER_ERROR_MESSAGE: &str = "Server error during authentication";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// HTTP API error rendered as the gateway's single error envelope:
///
/// ```json
/// { "success": false, "error": "...", "message": "...", "code": "...", "details": "..." }
/// ```
///
/// `error` carries the specific reason and `message` the human summary; for
/// client errors both hold the same text. `details` only appears when the
/// handler opted into exposing it (non-production).
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError(String),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // Backend rejected the forwarded call; its status is relayed unchanged
    Backend { status: StatusCode, message: String },

    // 500 while resolving the caller's identity
    AuthServerError { error: String },

    // 500 Internal Server Error
    InternalServerError { error: String, details: Option<String> },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Backend { status, .. } => *status,
            ApiError::AuthServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable summary
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError(msg) => msg,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Backend { message, .. } => message,
            ApiError::AuthServerError { .. } => AUTH_SERVER_ERROR_MESSAGE,
            ApiError::InternalServerError { .. } => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Specific reason, the `error` field of the envelope
    pub fn reason(&self) -> &str {
        match self {
            ApiError::AuthServerError { error } => error,
            ApiError::InternalServerError { error, .. } => error,
            _ => self.message(),
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Backend { .. } => "BACKEND_ERROR",
            ApiError::AuthServerError { .. } => "AUTH_SERVER_ERROR",
            ApiError::InternalServerError { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.reason(),
            "message": self.message(),
            "code": self.error_code(),
        });

        if let ApiError::InternalServerError {
            details: Some(details),
            ..
        } = self
        {
            body["details"] = Value::String(details.clone());
        }

        body
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        ApiError::ValidationError(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn backend(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Backend {
            status,
            message: message.into(),
        }
    }

    pub fn auth_server_error(error: impl Into<String>) -> Self {
        ApiError::AuthServerError {
            error: error.into(),
        }
    }

    /// Wrap an unexpected local failure. When `expose_details` is set the
    /// full source chain travels in `details`.
    pub fn internal(err: &(dyn std::error::Error + 'static), expose_details: bool) -> Self {
        let details = expose_details.then(|| error_chain(err));
        ApiError::InternalServerError {
            error: err.to_string(),
            details,
        }
    }
}

/// `outer: inner: innermost`
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let mut response = (self.status_code(), Json(self.to_json())).into_response();
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }
}
