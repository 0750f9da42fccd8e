//! Auth gate: the identity check every mutation passes before touching the network.
//!
//! Sign-in itself happens at the external identity provider; this module only
//! answers "who is acting right now, if anyone".

use serde::{Deserialize, Serialize};

/// Identity returned by a successful auth check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
}

/// Supplies the current identity, or `None` when nobody is signed in.
pub trait AuthGate: Send + Sync {
    fn check_auth(&self) -> Option<Identity>;
}

/// Auth gate with a fixed answer, e.g. the user configured for a CLI session.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    identity: Option<Identity>,
}

impl StaticAuth {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            identity: Some(Identity {
                user_id: user_id.into(),
            }),
        }
    }

    pub fn signed_out() -> Self {
        Self { identity: None }
    }

    /// Signed in when `user_id` is present and non-blank.
    pub fn from_user_id(user_id: Option<&str>) -> Self {
        match user_id.map(str::trim) {
            Some(id) if !id.is_empty() => Self::signed_in(id),
            _ => Self::signed_out(),
        }
    }
}

impl AuthGate for StaticAuth {
    fn check_auth(&self) -> Option<Identity> {
        self.identity.clone()
    }
}
