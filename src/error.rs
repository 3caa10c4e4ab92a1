//! Error taxonomy for a token issuance run
//!
//! Every failure maps to one process exit code. Messages never carry the
//! private key, the signed assertion, or an access token.

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Exit code for failures without a dedicated code (signing, file write)
pub const EXIT_FAILURE: u8 = 1;
/// Exit code when the HTTPS client cannot be initialised
pub const EXIT_DEPENDENCY_MISSING: u8 = 2;
/// Exit code when the private key file does not exist
pub const EXIT_KEY_FILE_NOT_FOUND: u8 = 3;
/// Exit code when listing installations fails
pub const EXIT_LIST_FAILED: u8 = 4;
/// Exit code when the token exchange request fails
pub const EXIT_EXCHANGE_FAILED: u8 = 5;
/// Exit code when the exchange response carries no token
pub const EXIT_MISSING_TOKEN: u8 = 6;

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum IssueError {
    /// The HTTPS client (TLS backend) could not be built
    #[error("Missing runtime dependency: failed to initialise HTTPS client: {0}")]
    DependencyMissing(#[source] reqwest::Error),

    /// Private key path does not exist
    #[error("Key file not found: {}", path.display())]
    KeyFileNotFound { path: PathBuf },

    /// Key could not be parsed or the assertion could not be signed
    #[error("Failed to sign app assertion: {0}")]
    Crypto(#[from] jsonwebtoken::errors::Error),

    /// `GET /app/installations` failed
    #[error("Failed to list installations: {0}")]
    ListInstallations(#[source] HttpError),

    /// `POST /app/installations/{id}/access_tokens` failed
    #[error("Failed to exchange for installation token: {0}")]
    ExchangeToken(#[source] HttpError),

    /// A trusted endpoint answered 2xx without a required field
    #[error("No {field} returned in response; aborting")]
    MalformedResponse { field: &'static str },

    /// Reading the key or writing the token file failed
    #[error("File error on {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the report to stdout failed
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl IssueError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            IssueError::DependencyMissing(_) => EXIT_DEPENDENCY_MISSING,
            IssueError::KeyFileNotFound { .. } => EXIT_KEY_FILE_NOT_FOUND,
            IssueError::ListInstallations(_) => EXIT_LIST_FAILED,
            IssueError::ExchangeToken(_) => EXIT_EXCHANGE_FAILED,
            IssueError::MalformedResponse { .. } => EXIT_MISSING_TOKEN,
            IssueError::Crypto(_) | IssueError::File { .. } | IssueError::Output(_) => {
                EXIT_FAILURE
            }
        }
    }

    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        IssueError::File {
            path: path.into(),
            source,
        }
    }
}

/// Failures of a single GitHub API call
#[derive(Debug, Error)]
pub enum HttpError {
    /// Connection, TLS, or timeout failure
    #[error("request failed: {}", with_causes(.0))]
    Transport(#[source] reqwest::Error),

    /// GitHub answered with a non-2xx status
    #[error("GitHub API error ({status}): {message}")]
    Status { status: StatusCode, message: String },

    /// 2xx response whose body is not the expected JSON shape
    #[error("failed to parse response: {}", with_causes(.0))]
    Decode(#[source] reqwest::Error),
}

/// `err` followed by each of its causes, joined with `: `
fn with_causes(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}
