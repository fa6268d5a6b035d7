use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint answered with a non-success status.
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// The request never produced a response (DNS, connect, reset, ...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body did not have the expected JSON shape.
    #[error("Malformed response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetch error: {0}")]
    Other(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
