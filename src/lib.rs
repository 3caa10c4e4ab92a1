//! GitHub App Token Library
//!
//! Authenticate as a GitHub App, list its installations, and exchange an
//! installation ID for a short-lived installation access token.
//!
//! ## Binary
//!
//! - `github-app-token`: list installations and optionally issue a token
//!
//! ## Example
//!
//! ```bash
//! # List installations only
//! github-app-token /path/to/private-key.pem --app-id 1952259 --list-only
//!
//! # Issue a token and save it with mode 600
//! github-app-token /path/to/private-key.pem \
//!   --app-id 1952259 \
//!   --installation-id 12345 \
//!   --out-file /tmp/installation.token
//! ```
//!
//! The token itself is never printed; only its expiry is reported.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod installations;
pub mod issuer;
pub mod telemetry;
pub mod token;
pub mod writer;

pub use cli::Args;
pub use config::{IssuerConfig, TokenRequest};
pub use error::IssueError;
pub use issuer::{run, RunOutcome};
