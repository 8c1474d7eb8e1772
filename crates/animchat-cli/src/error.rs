//! Chat client error types.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx reply; `message` is the server's `error` field when present.
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Whether the request never reached the server.
    pub fn is_connection(&self) -> bool {
        match self {
            ClientError::Network(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
