// errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed announcement payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    BadBaseUrl(String),

    #[error("Push channel error: {0}")]
    Push(#[from] tokio_tungstenite::tungstenite::Error),
}
