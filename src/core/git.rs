use std::path::Path;

use crate::error::Result;
use crate::merge::OriginSource;
use crate::utils::command;

// ============================================================================
// Low-level Git Primitives (path-based)
// ============================================================================

/// Whether `dir` already contains a git repository.
pub fn is_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// URL of the `origin` remote, if one is configured.
pub fn origin_url(dir: &Path) -> Option<String> {
    command::run_in_optional(dir, "git", &["remote", "get-url", "origin"])
}

pub fn init(dir: &Path) -> Result<String> {
    command::run_in(dir, "git", &["init"])
}

pub fn add_all(dir: &Path) -> Result<String> {
    command::run_in(dir, "git", &["add", "."])
}

pub fn add_paths(dir: &Path, paths: &[&str]) -> Result<String> {
    let mut args = vec!["add", "--"];
    args.extend_from_slice(paths);
    command::run_in(dir, "git", &args)
}

/// Remove paths from the index, keeping them in the working tree. Works
/// before the first commit, unlike `git reset`.
pub fn unstage(dir: &Path, paths: &[&str]) -> Result<String> {
    let mut args = vec!["rm", "--cached", "--quiet", "--"];
    args.extend_from_slice(paths);
    command::run_in(dir, "git", &args)
}

/// Commit staged changes with a subject line and an optional body paragraph.
pub fn commit(dir: &Path, subject: &str, body: Option<&str>) -> Result<String> {
    let mut args = vec!["commit", "--quiet", "-m", subject];
    if let Some(body) = body.filter(|b| !b.is_empty()) {
        args.extend_from_slice(&["-m", body]);
    }
    command::run_in(dir, "git", &args)
}

/// Rename the current branch, overwriting any existing branch of that name.
pub fn rename_branch(dir: &Path, branch: &str) -> Result<String> {
    command::run_in(dir, "git", &["branch", "-M", branch])
}

pub fn add_remote(dir: &Path, name: &str, url: &str) -> Result<String> {
    command::run_in(dir, "git", &["remote", "add", name, url])
}

pub fn push_upstream(dir: &Path, remote: &str, branch: &str) -> Result<String> {
    command::run_in(dir, "git", &["push", "--quiet", "-u", remote, branch])
}

pub fn push(dir: &Path) -> Result<String> {
    command::run_in(dir, "git", &["push", "--quiet"])
}

/// Reads `origin` through the git CLI.
pub struct GitOrigin;

impl OriginSource for GitOrigin {
    fn origin_url(&self, dir: &Path) -> Option<String> {
        origin_url(dir)
    }
}
