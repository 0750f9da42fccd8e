use thiserror::Error;

use crate::client::ClientError;
use crate::image::ImageError;

/// Why a user action did not complete.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The auth gate returned no identity; nothing was sent
    #[error("login required")]
    Unauthenticated,
    /// A required field was blank; nothing was sent
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] ClientError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl ActionError {
    /// Text for the blocking notice shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Store(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
