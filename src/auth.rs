//! GitHub App Authentication
//!
//! Loads the app's private key and signs the short-lived JWT used to
//! authenticate as the app itself.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IssueError;

/// Assertion lifetime in seconds (GitHub's maximum)
pub const ASSERTION_LIFETIME_SECS: i64 = 600;

/// JWT claims for GitHub App authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClaims {
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer (GitHub App ID)
    pub iss: i64,
}

impl AppClaims {
    /// Claims for `app_id`, valid from `issued_at` for the full lifetime
    pub fn new(app_id: i64, issued_at: DateTime<Utc>) -> Self {
        let iat = issued_at.timestamp();
        Self {
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
            iss: app_id,
        }
    }
}

/// PEM-encoded private key read from disk
pub struct PrivateKey(SecretSlice<u8>);

impl PrivateKey {
    pub fn from_pem(pem: Vec<u8>) -> Self {
        Self(SecretSlice::from(pem))
    }
}

/// Signed app assertion, only ever sent as a bearer credential
pub struct AppAssertion {
    jwt: SecretString,
    claims: AppClaims,
}

impl AppAssertion {
    pub fn claims(&self) -> &AppClaims {
        &self.claims
    }

    pub(crate) fn bearer(&self) -> &str {
        self.jwt.expose_secret()
    }
}

/// Read the private key at `path`.
///
/// A missing file is reported separately so the caller can exit before any
/// network traffic.
pub fn load_private_key(path: &Path) -> Result<PrivateKey, IssueError> {
    match fs::read(path) {
        Ok(pem) => {
            debug!(path = %path.display(), "Loaded private key");
            Ok(PrivateKey::from_pem(pem))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(IssueError::KeyFileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(IssueError::file(path, e)),
    }
}

/// Generate a JWT for GitHub App authentication
///
/// # Arguments
/// * `key` - The app's RSA private key in PEM format
/// * `app_id` - The GitHub App ID
/// * `issued_at` - Issue time; expiry is ten minutes later
pub fn sign_assertion(
    key: &PrivateKey,
    app_id: i64,
    issued_at: DateTime<Utc>,
) -> Result<AppAssertion, IssueError> {
    let claims = AppClaims::new(app_id, issued_at);

    let encoding_key = EncodingKey::from_rsa_pem(key.0.expose_secret())?;
    let header = Header::new(Algorithm::RS256);
    let jwt = encode(&header, &claims, &encoding_key)?;

    debug!(app_id, iat = claims.iat, exp = claims.exp, "Signed app assertion");

    Ok(AppAssertion {
        jwt: SecretString::new(jwt.into_boxed_str()),
        claims,
    })
}
