//! Command-line arguments

use std::ffi::OsStr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::{expand_home, IssuerConfig, TokenRequest, DEFAULT_API_URL, DEFAULT_APP_ID};

/// GitHub App Installation Token Helper
#[derive(Parser, Debug)]
#[command(name = "github-app-token")]
#[command(about = "List GitHub App installations and issue installation access tokens")]
#[command(version)]
pub struct Args {
    /// Path to the GitHub App private key PEM
    pub key_file: PathBuf,

    /// GitHub App ID
    #[arg(long, env = "GITHUB_APP_ID", default_value_t = DEFAULT_APP_ID)]
    pub app_id: i64,

    /// Installation ID to exchange for a token (optional)
    #[arg(long, env = "GITHUB_INSTALLATION_ID")]
    pub installation_id: Option<String>,

    /// Write the installation token to this file (mode 600). Do NOT commit the file.
    #[arg(long)]
    pub out_file: Option<PathBuf>,

    /// Only list installations (do not exchange a token)
    #[arg(long)]
    pub list_only: bool,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve arguments into the run configuration.
    ///
    /// `home` is the value of `HOME`, used for `~` expansion of the key path.
    pub fn into_config(self, home: Option<&OsStr>) -> IssuerConfig {
        let request = TokenRequest::resolve(self.list_only, self.installation_id, self.out_file);
        IssuerConfig::new(
            expand_home(&self.key_file, home),
            self.app_id,
            &self.api_url,
            request,
        )
    }
}
