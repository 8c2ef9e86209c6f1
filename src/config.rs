//! Configuration constants and profile loading for myflix
//!
//! Profiles live in an INI file, one section per profile name:
//!
//! ```ini
//! [default]
//! server = https://myflix-ah-72292705dfa8.herokuapp.com/
//! session_path = ~/.myflix/session.json
//! timeout_secs = 30
//! ```

use anyhow::{Context, Result};
use ini::Ini;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default profile file path for myflix
pub const DEFAULT_PROFILE_PATH: &str = "~/.myflix/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "MYFLIX_PROFILE_PATH";

/// Service used when the profile does not name one
pub const DEFAULT_SERVER: &str = "https://myflix-ah-72292705dfa8.herokuapp.com/";

/// Where the session blob is kept unless the profile says otherwise
pub const DEFAULT_SESSION_PATH: &str = "~/.myflix/session.json";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Expand a leading `~` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Connection settings for one profile
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub server: Url,
    pub session_path: PathBuf,
    pub timeout: Option<Duration>,
}

impl Profile {
    /// Profile with built-in defaults
    pub fn blank(name: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            server: Url::parse(DEFAULT_SERVER).context("Invalid default server URL")?,
            session_path: expand_path(DEFAULT_SESSION_PATH),
            timeout: None,
        })
    }

    /// Load `name` from the INI file at `path`.
    ///
    /// A missing file or section yields the defaults; malformed values are errors.
    pub fn load(path: &Path, name: &str) -> Result<Self> {
        tracing::debug!("Loading profile '{}' from '{}'", name, path.display());

        let mut profile = Self::blank(name)?;
        if !path.exists() {
            tracing::debug!("Profile file not found, using defaults");
            return Ok(profile);
        }

        let ini = Ini::load_from_file(path)
            .with_context(|| format!("Failed to read profile file {}", path.display()))?;
        let Some(section) = ini.section(Some(name)) else {
            tracing::debug!("Profile '{}' not found, using defaults", name);
            return Ok(profile);
        };

        if let Some(server) = section.get("server") {
            profile.server = Url::parse(server.trim())
                .with_context(|| format!("Invalid server URL '{server}' in profile '{name}'"))?;
        }
        if let Some(session_path) = section.get("session_path") {
            profile.session_path = expand_path(session_path.trim());
        }
        if let Some(timeout) = section.get("timeout_secs") {
            let secs: u64 = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid timeout_secs '{timeout}' in profile '{name}'"))?;
            profile.timeout = Some(Duration::from_secs(secs));
        }

        tracing::debug!("Profile loaded successfully, server: {}", profile.server);
        Ok(profile)
    }
}
