use axum::Extension;

use crate::auth::Identity;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/auth/session - the identity resolved by `verify_credential`.
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": "5b1c0f1e-...",
///     "email": "tenant@example.com",
///     "role": "authenticated",
///     ...
///   }
/// }
/// ```
pub async fn session(Extension(identity): Extension<Identity>) -> ApiResult<Identity> {
    tracing::debug!(user_id = %identity.id, "session lookup");
    Ok(ApiResponse::success(identity))
}
