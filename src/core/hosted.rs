//! Hosted repository references.
//!
//! Recognizes the common ways a GitHub, GitLab or Bitbucket repository is
//! written in a `repository.url` field and derives the URLs the descriptor
//! and git remote need from it.

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

// `github:owner/project`
static SHORTCUT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]+):([\w.-]+)/([\w.-]+?)(?:\.git)?/?$").expect("Invalid regex pattern")
});

// `git@github.com:owner/project.git`
static SCP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[\w.-]+@)?([\w.-]+\.[a-z]+):/?([\w.-]+)/([\w.-]+?)(?:\.git)?/?$")
        .expect("Invalid regex pattern")
});

// `owner/project`
static BARE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][\w.-]*)/([\w.-]+?)(?:\.git)?$").expect("Invalid regex pattern")
});

static FULL_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:git\+)?(?:https?|git|ssh)://(?:[^@/]+@)?([^/:]+)(?::\d+)?/([\w.-]+)/([\w.-]+?)(?:\.git)?/?$",
    )
    .expect("Invalid regex pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    GitHub,
    GitLab,
    Bitbucket,
}

impl HostKind {
    pub fn domain(&self) -> &'static str {
        match self {
            HostKind::GitHub => "github.com",
            HostKind::GitLab => "gitlab.com",
            HostKind::Bitbucket => "bitbucket.org",
        }
    }

    fn from_domain(domain: &str) -> Option<Self> {
        let domain = domain.to_ascii_lowercase();
        match domain.strip_prefix("www.").unwrap_or(&domain) {
            "github.com" => Some(HostKind::GitHub),
            "gitlab.com" => Some(HostKind::GitLab),
            "bitbucket.org" => Some(HostKind::Bitbucket),
            _ => None,
        }
    }

    fn from_shortcut(shortcut: &str) -> Option<Self> {
        match shortcut {
            "github" => Some(HostKind::GitHub),
            "gitlab" => Some(HostKind::GitLab),
            "bitbucket" => Some(HostKind::Bitbucket),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostedRepo {
    pub host: HostKind,
    pub owner: String,
    pub project: String,
}

impl HostedRepo {
    /// Parse a repository URL or npm-style shorthand.
    ///
    /// Accepts `https://`, `git://`, `ssh://` and `git+…` URLs, scp-like
    /// `git@host:owner/project.git`, `github:owner/project` style shortcuts
    /// and bare `owner/project` (GitHub). Returns `None` for anything else.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = url.trim();
        let url = url.split('#').next().unwrap_or(url);
        if url.is_empty() {
            return None;
        }

        if url.contains("://") {
            return Self::from_full_url(url);
        }

        if let Some(caps) = SHORTCUT_PATTERN.captures(url) {
            if let Some(host) = HostKind::from_shortcut(&caps[1]) {
                return Self::build(host, &caps[2], &caps[3]);
            }
        }

        if let Some(caps) = SCP_PATTERN.captures(url) {
            let host = HostKind::from_domain(&caps[1])?;
            return Self::build(host, &caps[2], &caps[3]);
        }

        if let Some(caps) = BARE_PATTERN.captures(url) {
            return Self::build(HostKind::GitHub, &caps[1], &caps[2]);
        }

        None
    }

    fn from_full_url(url: &str) -> Option<Self> {
        let caps = FULL_URL_PATTERN.captures(url)?;
        let host = HostKind::from_domain(&caps[1])?;
        Self::build(host, &caps[2], &caps[3])
    }

    fn build(host: HostKind, owner: &str, project: &str) -> Option<Self> {
        if owner.is_empty() || project.is_empty() || project == "." || project == ".." {
            return None;
        }

        Some(Self {
            host,
            owner: owner.to_string(),
            project: project.to_string(),
        })
    }

    /// `owner/project`
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.project)
    }

    pub fn browse_url(&self) -> String {
        format!("https://{}/{}", self.host.domain(), self.path())
    }

    pub fn bugs_url(&self) -> String {
        format!("{}/issues", self.browse_url())
    }

    pub fn https_url(&self) -> String {
        format!("{}.git", self.browse_url())
    }
}

/// Per-run memo of `url -> resolved reference`, owned by the caller.
#[derive(Debug, Default)]
pub struct RepoCache {
    entries: HashMap<String, Option<HostedRepo>>,
}

impl RepoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, url: &str) -> Option<HostedRepo> {
        self.entries
            .entry(url.to_string())
            .or_insert_with(|| HostedRepo::from_url(url))
            .clone()
    }
}
