use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    /// Unknown device and bad credentials deliberately share this variant.
    #[error("Not authorized")]
    NotAuthorized,
}

impl PresenceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PresenceError::NotAuthorized => StatusCode::FORBIDDEN,
        }
    }
}
