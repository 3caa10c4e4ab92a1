//! GitHub REST API client
//!
//! Thin reqwest wrapper authenticated with the app assertion. Each call is a
//! single attempt bounded by [`HTTP_TIMEOUT`].

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::auth::AppAssertion;
use crate::config::HTTP_TIMEOUT;
use crate::error::{HttpError, IssueError};
use crate::installations::Installation;
use crate::token::AccessTokenResponse;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("github-app-token/", env!("CARGO_PKG_VERSION"));

/// Longest slice of a non-JSON error body kept in messages
const MAX_ERROR_BODY: usize = 200;

/// GitHub error document
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// GitHub API client authenticated as the app
pub struct GitHubAppClient {
    client: Client,
    api_url: String,
}

impl GitHubAppClient {
    /// Build the HTTPS client.
    ///
    /// Fails only when the TLS backend cannot be initialised.
    pub fn new(api_url: &str) -> Result<Self, IssueError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(IssueError::DependencyMissing)?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// `GET /app/installations`
    pub async fn list_installations(
        &self,
        assertion: &AppAssertion,
    ) -> Result<Vec<Installation>, HttpError> {
        let url = format!("{}/app/installations", self.api_url);
        debug!(url = %url, "Listing installations");

        let request = self
            .authorized(self.client.get(&url), assertion)
            .query(&[("per_page", "100")]);
        json_body(send(request).await?).await
    }

    /// `POST /app/installations/{id}/access_tokens`
    pub async fn create_access_token(
        &self,
        assertion: &AppAssertion,
        installation_id: &str,
    ) -> Result<AccessTokenResponse, HttpError> {
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.api_url,
            urlencoding::encode(installation_id)
        );
        debug!(url = %url, "Requesting installation access token");

        let request = self.authorized(self.client.post(&url), assertion);
        json_body(send(request).await?).await
    }

    fn authorized(&self, request: RequestBuilder, assertion: &AppAssertion) -> RequestBuilder {
        request
            .bearer_auth(assertion.bearer())
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }
}

async fn send(request: RequestBuilder) -> Result<Response, HttpError> {
    let response = request.send().await.map_err(HttpError::Transport)?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(HttpError::Status {
        status,
        message: error_message(&body),
    })
}

async fn json_body<T: DeserializeOwned>(response: Response) -> Result<T, HttpError> {
    response.json::<T>().await.map_err(HttpError::Decode)
}

/// GitHub's `message` field, else a bounded prefix of the raw body
fn error_message(body: &str) -> String {
    if let Ok(error) = serde_json::from_str::<ApiErrorBody>(body) {
        return error.message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((end, _)) => format!("{}...", &trimmed[..end]),
        None => trimmed.to_string(),
    }
}
