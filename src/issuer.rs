//! Token issuance run
//!
//! Key → assertion → installation listing → optional exchange → optional
//! persistence, strictly in that order and at most once each.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::{load_private_key, sign_assertion};
use crate::client::GitHubAppClient;
use crate::config::{IssuerConfig, TokenRequest};
use crate::error::IssueError;
use crate::installations::InstallationReport;
use crate::token::InstallationToken;
use crate::writer::write_secret;

/// Stages of a run, in the only order they may occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    KeyLoaded,
    AssertionSigned,
    InstallationsListed,
    Idle,
    TokenExchanged,
    TokenPersisted,
    Terminal,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::KeyLoaded => "key-loaded",
            Stage::AssertionSigned => "assertion-signed",
            Stage::InstallationsListed => "installations-listed",
            Stage::Idle => "idle",
            Stage::TokenExchanged => "token-exchanged",
            Stage::TokenPersisted => "token-persisted",
            Stage::Terminal => "terminal",
        };
        f.write_str(name)
    }
}

/// Forward-only stage tracker
#[derive(Debug)]
pub struct Progress {
    stage: Stage,
}

impl Progress {
    pub fn new() -> Self {
        Self { stage: Stage::Init }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Move to `next`; returns false (and stays put) for a backwards or
    /// repeated transition, or for leaving `Idle` anywhere but `Terminal`.
    pub fn advance(&mut self, next: Stage) -> bool {
        if next <= self.stage || (self.stage == Stage::Idle && next != Stage::Terminal) {
            return false;
        }
        debug!(from = %self.stage, to = %next, "Stage transition");
        self.stage = next;
        true
    }

    /// Advance along a transition the run guarantees to be legal.
    fn enter(&mut self, next: Stage) {
        let from = self.stage;
        let moved = self.advance(next);
        debug_assert!(moved, "illegal stage transition {from} -> {next}");
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// `--list-only`
    Listed { installations: usize },
    /// Listed, but no installation id to exchange
    NoInstallation { installations: usize },
    /// Token exchanged, only expiry reported
    TokenGenerated { expires_at: Option<Value> },
    /// Token exchanged and written to disk
    TokenSaved {
        out_file: PathBuf,
        expires_at: Option<Value>,
    },
}

/// Final status line; never carries the token
#[derive(Debug, Serialize)]
struct TokenStatus<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    out_file: Option<String>,
    expires_at: Option<&'a Value>,
}

/// Execute one run, writing JSON reports to `out`.
pub async fn run<W: Write>(config: &IssuerConfig, out: &mut W) -> Result<RunOutcome, IssueError> {
    let mut progress = Progress::new();

    let client = GitHubAppClient::new(&config.api_url)?;

    let key = load_private_key(&config.key_file)?;
    progress.enter(Stage::KeyLoaded);

    let assertion = sign_assertion(&key, config.app_id, Utc::now())?;
    progress.enter(Stage::AssertionSigned);
    info!(
        app_id = config.app_id,
        expires = assertion.claims().exp,
        "🔐 Generated app assertion"
    );

    let installations = client
        .list_installations(&assertion)
        .await
        .map_err(IssueError::ListInstallations)?;
    progress.enter(Stage::InstallationsListed);

    let count = installations.len();
    info!(count, "📋 Listed installations");
    let report = InstallationReport::new(installations);
    serde_json::to_writer_pretty(&mut *out, &report).map_err(std::io::Error::from)?;
    writeln!(out)?;

    let outcome = match &config.request {
        TokenRequest::ListOnly => {
            progress.enter(Stage::Idle);
            info!("Listed installations (no token exchanged).");
            RunOutcome::Listed {
                installations: count,
            }
        }
        TokenRequest::NoInstallation => {
            progress.enter(Stage::Idle);
            info!(
                "No --installation-id provided. Set GITHUB_INSTALLATION_ID or pass --installation-id to exchange for a token."
            );
            RunOutcome::NoInstallation {
                installations: count,
            }
        }
        TokenRequest::Exchange {
            installation_id,
            out_file,
        } => {
            info!(installation_id = %installation_id, "🔑 Exchanging assertion for installation token");
            let response = client
                .create_access_token(&assertion, installation_id)
                .await
                .map_err(IssueError::ExchangeToken)?;
            let token = InstallationToken::try_from(response)?;
            progress.enter(Stage::TokenExchanged);

            match out_file {
                Some(path) => {
                    write_secret(path, token.expose())?;
                    progress.enter(Stage::TokenPersisted);
                    info!(path = %path.display(), "✅ Token saved");
                    print_status(
                        out,
                        "saved",
                        Some(path.display().to_string()),
                        token.expires_at(),
                    )?;
                    RunOutcome::TokenSaved {
                        out_file: path.clone(),
                        expires_at: token.expires_at().cloned(),
                    }
                }
                None => {
                    print_status(out, "token-generated", None, token.expires_at())?;
                    RunOutcome::TokenGenerated {
                        expires_at: token.expires_at().cloned(),
                    }
                }
            }
        }
    };

    progress.enter(Stage::Terminal);
    Ok(outcome)
}

fn print_status<W: Write>(
    out: &mut W,
    status: &'static str,
    out_file: Option<String>,
    expires_at: Option<&Value>,
) -> Result<(), IssueError> {
    let line = TokenStatus {
        status,
        out_file,
        expires_at,
    };
    serde_json::to_writer(&mut *out, &line).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
