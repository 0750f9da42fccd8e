//! Remote store error types.

use thiserror::Error;

/// Errors returned by a [`RemoteStore`](super::RemoteStore) call.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The record addressed by the call does not exist (any more)
    #[error("not found: {0}")]
    NotFound(String),
    /// The server answered with a non-success status
    #[error("{message}")]
    Server { status: u16, message: String },
    /// The request never got a response
    #[error("HTTP error: {0}")]
    Http(String),
    /// The response body could not be decoded
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// Message suitable for a user-facing notice.
    ///
    /// Server-reported messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::NotFound(message) => message.clone(),
            ClientError::Server { message, .. } => message.clone(),
            ClientError::Http(_) | ClientError::Decode(_) => {
                "request failed, please try again".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Http(e.to_string())
        }
    }
}
