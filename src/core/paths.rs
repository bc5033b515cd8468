use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base pkgseed config directory (~/.config/pkgseed/ on Unix-like systems)
pub fn pkgseed() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("pkgseed"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("pkgseed"))
    }
}

/// Global pkgseed.json config file path
pub fn pkgseed_json() -> Result<PathBuf> {
    Ok(pkgseed()?.join("pkgseed.json"))
}

/// Default template directory
pub fn template_dir() -> Result<PathBuf> {
    Ok(pkgseed()?.join("template"))
}
