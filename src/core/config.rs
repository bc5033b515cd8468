use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths;

/// Root configuration structure for pkgseed.json.
///
/// Every field falls back to a built-in default, so a partial file only
/// overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedConfig {
    /// Account (user or organisation) new repositories are created under.
    #[serde(default)]
    pub remote_account: Option<String>,

    /// Directory prefixes that map to package scopes (`me-tool` -> `@me/tool`).
    #[serde(default)]
    pub naming_prefixes: Vec<String>,

    #[serde(default = "default_remote_host")]
    pub remote_host: String,

    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    #[serde(default)]
    pub template_dir: Option<String>,

    #[serde(default = "default_branch")]
    pub default_branch: String,

    #[serde(default = "default_install_command")]
    pub install_command: Vec<String>,

    #[serde(default = "default_commit_trailer")]
    pub commit_trailer: String,

    /// Store an encrypted hosting token in the CI config after the first push.
    #[serde(default = "default_ci_secret")]
    pub ci_secret: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            remote_account: None,
            naming_prefixes: Vec::new(),
            remote_host: default_remote_host(),
            registry_url: default_registry_url(),
            template_dir: None,
            default_branch: default_branch(),
            install_command: default_install_command(),
            commit_trailer: default_commit_trailer(),
            ci_secret: default_ci_secret(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_remote_host() -> String {
    "github.com".to_string()
}

fn default_registry_url() -> String {
    "https://npmjs.com/package/".to_string()
}

fn default_branch() -> String {
    "latest".to_string()
}

fn default_install_command() -> Vec<String> {
    vec!["npm".to_string(), "i".to_string()]
}

fn default_commit_trailer() -> String {
    "Automatically generated by pkgseed".to_string()
}

fn default_ci_secret() -> bool {
    true
}

impl SeedConfig {
    /// Template directory with `~` expanded, or the default under the config dir.
    pub fn resolved_template_dir(&self) -> Result<PathBuf> {
        match self.template_dir.as_deref() {
            Some(dir) if !dir.trim().is_empty() => {
                Ok(PathBuf::from(shellexpand::tilde(dir.trim()).into_owned()))
            }
            _ => paths::template_dir(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.remote_host.trim().is_empty() || self.remote_host.contains('/') {
            return Err(Error::config_invalid_value(
                "remoteHost",
                "remoteHost must be a bare host name such as github.com",
            ));
        }

        if self.default_branch.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "defaultBranch",
                "defaultBranch cannot be empty",
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load the pkgseed.json config, falling back to defaults on any error.
pub fn load_config() -> SeedConfig {
    paths::pkgseed_json()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_default()
}

/// Load config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<SeedConfig> {
    if !path.exists() {
        return Err(Error::internal_io(
            format!("{} not found", path.display()),
            Some("load config".to_string()),
        ));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    let config: SeedConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;

    config.validate()?;

    Ok(config)
}
