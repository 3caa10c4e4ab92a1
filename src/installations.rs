//! Installation records
//!
//! Only the fields in [`InstallationSummary`] are ever deserialized from the
//! API response, so nothing else a record carries can reach the output.
//! `created_at` is echoed exactly as GitHub sent it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Account the app is installed on
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: Option<String>,
}

/// One entry of `GET /app/installations`
#[derive(Debug, Clone, Deserialize)]
pub struct Installation {
    pub id: u64,
    pub account: Option<Account>,
    pub repository_selection: Option<String>,
    pub app_id: Option<i64>,
    pub created_at: Option<Value>,
}

/// Sanitized projection printed to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationSummary {
    pub id: u64,
    pub account: Option<String>,
    pub repository_selection: Option<String>,
    pub app_id: Option<i64>,
    pub created_at: Option<Value>,
}

impl From<Installation> for InstallationSummary {
    fn from(installation: Installation) -> Self {
        Self {
            id: installation.id,
            account: installation.account.and_then(|a| a.login),
            repository_selection: installation.repository_selection,
            app_id: installation.app_id,
            created_at: installation.created_at,
        }
    }
}

/// Listing report written to stdout
#[derive(Debug, Serialize)]
pub struct InstallationReport {
    pub installations: Vec<InstallationSummary>,
}

impl InstallationReport {
    pub fn new(installations: Vec<Installation>) -> Self {
        Self {
            installations: installations.into_iter().map(Into::into).collect(),
        }
    }
}
