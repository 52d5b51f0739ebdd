//! Client-held proof of authentication.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Token plus the identity it was issued for. Presence means "logged in".
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    #[serde(default)]
    pub id: String,
    pub token: String,
}

impl Session {
    pub fn new(username: impl Into<String>, id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            id: id.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("id", &self.id)
            .field("token", &"<redacted>")
            .finish()
    }
}
