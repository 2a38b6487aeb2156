pub mod auth;
pub mod response;

pub use auth::{require_credential, verify_credential};
pub use response::{ApiResponse, ApiResult};
