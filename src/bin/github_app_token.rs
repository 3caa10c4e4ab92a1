//! GitHub App Installation Token Helper
//!
//! Signs an app assertion with the GitHub App private key, lists the app's
//! installations, and optionally exchanges one installation ID for an
//! installation access token saved to an owner-only file.
//!
//! ## Usage
//! ```bash
//! # With command line arguments
//! github-app-token ./key.pem \
//!   --app-id 123456 \
//!   --installation-id 78901234 \
//!   --out-file /tmp/installation.token
//!
//! # With environment variables
//! GITHUB_APP_ID=123456 \
//! GITHUB_INSTALLATION_ID=78901234 \
//! github-app-token ./key.pem --out-file /tmp/installation.token
//! ```
//!
//! Exit codes: 0 success, 1 other failure, 2 missing runtime dependency,
//! 3 key file not found, 4 listing failed, 5 token exchange failed,
//! 6 response lacked a token.

use std::env;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use github_app_token::{run, telemetry, Args};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = telemetry::init_tracing(args.verbose) {
        eprintln!("{e}");
    }

    let config = args.into_config(env::var_os("HOME").as_deref());
    let mut stdout = io::stdout().lock();

    match run(&config, &mut stdout).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
