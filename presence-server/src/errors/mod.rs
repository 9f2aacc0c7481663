pub mod api;
pub mod presence;
pub mod storage;

pub use api::ApiError;
pub use presence::PresenceError;
pub use storage::StorageError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let cause = match self {
            // Callers only ever see the fixed denial text
            ApiError::PresenceError(e) => return (e.status_code(), e.to_string()).into_response(),
            ApiError::StorageError(e) => e.to_string(),
            ApiError::InternalError(e) => format!("{:#}", e),
        };

        let error_id = Uuid::new_v4();
        tracing::error!(error_id = ?error_id, "Internal error: {}", cause);

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": "Internal server error",
                "error_id": error_id.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
