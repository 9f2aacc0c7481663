#[derive(Debug, thiserror::Error)]
pub enum FenceError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {0} failed: {1}")]
    Request(String, #[source] reqwest::Error),
}
