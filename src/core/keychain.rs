//! Keychain storage for hosting credentials.
//!
//! Uses the system keychain (macOS Keychain, Linux Secret Service, Windows
//! Credential Manager).

use crate::error::{Error, ErrorCode, Result};
use keyring::Entry;
use serde_json::Value;
use std::env;

const SERVICE_NAME: &str = "pkgseed";

/// Environment variables checked before the keychain, in order.
const TOKEN_ENV_VARS: &[&str] = &["GH_TOKEN", "GITHUB_TOKEN"];

fn keyring_error(e: keyring::Error) -> Error {
    Error::new(
        ErrorCode::CredentialsUnavailable,
        format!("Keychain error: {}", e),
        Value::Null,
    )
}

/// Key format: `<host>:<account>`
fn entry_key(host: &str, account: &str) -> String {
    format!("{}:{}", host, account)
}

/// Retrieves a hosting token from the keychain.
///
/// Returns `None` if the key doesn't exist.
pub fn get(host: &str, account: &str) -> Result<Option<String>> {
    let entry = Entry::new(SERVICE_NAME, &entry_key(host, account)).map_err(keyring_error)?;

    match entry.get_password() {
        Ok(value) => Ok(Some(value)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(keyring_error(e)),
    }
}

/// Token for `account` on `host`: environment first, then the keychain.
pub fn hosting_token(host: &str, account: &str) -> Result<String> {
    if let Some(token) = token_from_env(|name| env::var(name).ok()) {
        return Ok(token);
    }

    get(host, account)?
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::credentials_unavailable(entry_key(host, account)))
}

fn token_from_env<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}
