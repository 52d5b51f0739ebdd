use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{MissingIdError, first_id, require_id};

/// Body for `POST /auth/login` and `POST /auth/signup`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAuthUser")]
pub struct AuthUser {
    pub id: String,
    pub username: Option<String>,
}

#[derive(Deserialize)]
struct RawAuthUser {
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

impl TryFrom<RawAuthUser> for AuthUser {
    type Error = MissingIdError;

    fn try_from(raw: RawAuthUser) -> Result<Self, Self::Error> {
        Ok(Self {
            id: require_id("user", [raw.id, raw.legacy_id])?,
            username: raw.username,
        })
    }
}

/// Successful login/signup response. Only `token` is guaranteed; some
/// deployments also echo the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAuthResponse")]
pub struct AuthResponse {
    pub token: String,
    pub user: Option<AuthUser>,
    pub id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthResponse {
    token: String,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

impl From<RawAuthResponse> for AuthResponse {
    fn from(raw: RawAuthResponse) -> Self {
        Self {
            token: raw.token,
            user: raw.user,
            id: first_id([raw.id, raw.legacy_id, raw.user_id]),
        }
    }
}

impl AuthResponse {
    /// User id from whichever field the service filled in.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|u| u.id.as_str())
            .or(self.id.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error payload the service sends alongside non-2xx statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}
