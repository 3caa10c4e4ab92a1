//! Run configuration
//!
//! Everything the run needs from flags and the environment, resolved once at
//! startup and passed down explicitly.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// App ID used when neither `--app-id` nor `GITHUB_APP_ID` is given
pub const DEFAULT_APP_ID: i64 = 1952259;

/// Public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Per-request timeout for GitHub API calls
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// What to do once installations have been listed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRequest {
    /// `--list-only`: never exchange, even when an installation id is known
    ListOnly,
    /// No installation id was supplied
    NoInstallation,
    /// Exchange the installation id for a token, optionally persisting it
    Exchange {
        installation_id: String,
        out_file: Option<PathBuf>,
    },
}

impl TokenRequest {
    /// Decide the post-listing action. `--list-only` always wins.
    pub fn resolve(
        list_only: bool,
        installation_id: Option<String>,
        out_file: Option<PathBuf>,
    ) -> Self {
        if list_only {
            return TokenRequest::ListOnly;
        }

        match installation_id.map(|id| id.trim().to_string()) {
            Some(installation_id) if !installation_id.is_empty() => TokenRequest::Exchange {
                installation_id,
                out_file,
            },
            _ => TokenRequest::NoInstallation,
        }
    }
}

/// Resolved configuration for one run
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Private key path, `~` already expanded
    pub key_file: PathBuf,
    /// GitHub App ID (assertion issuer)
    pub app_id: i64,
    /// API base URL without a trailing slash
    pub api_url: String,
    /// Post-listing action
    pub request: TokenRequest,
}

impl IssuerConfig {
    pub fn new(key_file: PathBuf, app_id: i64, api_url: &str, request: TokenRequest) -> Self {
        Self {
            key_file,
            app_id,
            api_url: api_url.trim_end_matches('/').to_string(),
            request,
        }
    }
}

/// Expand a leading `~` against the given home directory.
///
/// Paths such as `~user/key.pem` are left alone, as is everything when no
/// home directory is known.
pub fn expand_home(path: &Path, home: Option<&OsStr>) -> PathBuf {
    let Some(home) = home.filter(|h| !h.is_empty()) else {
        return path.to_path_buf();
    };

    match path.strip_prefix("~") {
        Ok(rest) => Path::new(home).join(rest),
        Err(_) => path.to_path_buf(),
    }
}
