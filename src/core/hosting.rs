//! Hosted repository creation and CI secrets.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::hosted::{HostKind, HostedRepo};
use crate::utils::command;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Serialize)]
struct CreateRepoRequest<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    homepage: Option<&'a str>,
    private: bool,
}

#[derive(Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRepo {
    pub full_name: String,
    pub html_url: String,
}

/// What to create on the hosting provider.
#[derive(Debug, Clone)]
pub struct NewRepo<'a> {
    pub repo: &'a HostedRepo,
    pub description: &'a str,
    pub homepage: Option<&'a str>,
}

pub struct HostingClient {
    client: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

impl HostingClient {
    pub fn github(token: impl Into<String>) -> Result<Self> {
        Self::with_api_base(GITHUB_API, token)
    }

    pub fn with_api_base(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(format!("pkgseed/{}", VERSION))
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| {
                Error::internal_io(e.to_string(), Some("create HTTP client".to_string()))
            })?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn authenticated_login(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/user", self.api_base))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(|e| {
                Error::hosting_request_failed(e.to_string(), Some("query user".to_string()))
            })?;

        if !response.status().is_success() {
            return Err(Error::hosting_request_failed(
                format!("GET /user returned {}", response.status()),
                Some("query user".to_string()),
            ));
        }

        let user: GitHubUser = response.json().map_err(|e| {
            Error::internal_json(e.to_string(), Some("parse user response".to_string()))
        })?;
        Ok(user.login)
    }

    /// Create a private repository for `new.repo` under its owner.
    pub fn create_repository(&self, new: &NewRepo<'_>) -> Result<CreatedRepo> {
        if new.repo.host != HostKind::GitHub {
            return Err(Error::validation_invalid_argument(
                "repository.url",
                format!(
                    "Creating repositories on {} is not supported",
                    new.repo.host.domain()
                ),
            ));
        }

        let login = self.authenticated_login()?;
        let endpoint = create_endpoint(&self.api_base, &login, &new.repo.owner);
        let body = CreateRepoRequest {
            name: &new.repo.project,
            description: new.description,
            homepage: new.homepage,
            private: true,
        };

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .map_err(|e| {
                Error::hosting_request_failed(e.to_string(), Some("create repository".to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(Error::hosting_request_failed(
                format!("POST {} returned {}: {}", endpoint, status, text.trim()),
                Some("create repository".to_string()),
            ));
        }

        response.json().map_err(|e| {
            Error::internal_json(e.to_string(), Some("parse create response".to_string()))
        })
    }
}

/// Personal repositories go to `/user/repos`, organisation ones to
/// `/orgs/<owner>/repos`.
fn create_endpoint(api_base: &str, login: &str, owner: &str) -> String {
    if login.eq_ignore_ascii_case(owner) {
        format!("{}/user/repos", api_base)
    } else {
        format!("{}/orgs/{}/repos", api_base, owner)
    }
}

/// Encrypt `name=value` into the package's `.travis.yml` for `repo`.
pub fn store_ci_secret(dir: &Path, repo: &HostedRepo, name: &str, value: &str) -> Result<String> {
    let assignment = format!("{}={}", name, value);
    let path = repo.path();
    command::run_in(
        dir,
        "travis",
        &[
            "encrypt",
            &assignment,
            "--add",
            "--no-interactive",
            "-r",
            &path,
        ],
    )
}
