//! Subprocess execution primitives.
//!
//! Every call takes a program and an argument list; nothing is routed through
//! a shell, so descriptor text such as descriptions or slugs can never be
//! interpreted as shell syntax.

use std::path::Path;
use std::process::{Command, Output};

use crate::error::{CommandFailedDetails, Error, Result};

/// Run a command in `dir` and return trimmed stdout on success.
///
/// Failures become `external.command_failed` (or `git.command_failed` when the
/// program is git) carrying stderr, or stdout when stderr is empty.
pub fn run_in(dir: &Path, program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| {
            failure(program, args, None, format!("Failed to run {}: {}", program, e))
        })?;

    if !output.status.success() {
        return Err(failure(
            program,
            args,
            output.status.code(),
            error_text(&output),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a command in `dir`, returning `None` on any failure or empty output.
pub fn run_in_optional(dir: &Path, program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() {
        None
    } else {
        Some(stdout)
    }
}

/// Extract error text from command output.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
pub fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

fn failure(program: &str, args: &[&str], exit_code: Option<i32>, stderr: String) -> Error {
    let details = CommandFailedDetails {
        program: program.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
        exit_code,
        stderr,
    };

    if program == "git" {
        Error::git_command_failed(details)
    } else {
        Error::external_command_failed(details)
    }
}
