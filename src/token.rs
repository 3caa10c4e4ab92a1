//! Installation access tokens

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

use crate::error::IssueError;

/// Body of `POST /app/installations/{id}/access_tokens` as received.
///
/// No `Debug` so the raw token cannot be formatted by accident. Only the
/// token is validated; `expires_at` is carried through untouched.
#[derive(Deserialize)]
pub struct AccessTokenResponse {
    pub token: Option<String>,
    pub expires_at: Option<Value>,
}

/// Validated installation access token
#[derive(Debug)]
pub struct InstallationToken {
    token: SecretString,
    expires_at: Option<Value>,
}

impl InstallationToken {
    /// Expiry as reported by GitHub
    pub fn expires_at(&self) -> Option<&Value> {
        self.expires_at.as_ref()
    }

    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }
}

impl TryFrom<AccessTokenResponse> for InstallationToken {
    type Error = IssueError;

    fn try_from(response: AccessTokenResponse) -> Result<Self, Self::Error> {
        match response.token {
            Some(token) if !token.is_empty() => Ok(Self {
                token: SecretString::new(token.into_boxed_str()),
                expires_at: response.expires_at,
            }),
            _ => Err(IssueError::MalformedResponse { field: "token" }),
        }
    }
}
