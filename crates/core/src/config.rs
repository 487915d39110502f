//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the
//! gateway and the session. Nothing reads environment variables while handling
//! a user action.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DEFAULT_API_BASE, DEFAULT_DOWNLOAD_DIR, DEFAULT_NOTICE_TTL_SECS};
use crate::error::{ConfigError, ConfigResult};

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_base: String,
    download_dir: PathBuf,
    notice_ttl: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// `api_base` must be an `http://` or `https://` URL; a trailing slash is
    /// dropped. `download_dir` must be an existing directory.
    pub fn new(api_base: &str, download_dir: PathBuf, notice_ttl: Duration) -> ConfigResult<Self> {
        let api_base = api_base.trim().trim_end_matches('/');
        if api_base.is_empty() {
            return Err(ConfigError::InvalidInput("api base cannot be empty".into()));
        }
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidInput(format!(
                "api base must start with http:// or https://, got {api_base}"
            )));
        }

        if !download_dir.is_dir() {
            return Err(ConfigError::DownloadDirMissing { path: download_dir });
        }

        if notice_ttl.is_zero() {
            return Err(ConfigError::InvalidInput(
                "notice lifetime must be greater than zero".into(),
            ));
        }

        Ok(Self {
            api_base: api_base.to_owned(),
            download_dir,
            notice_ttl,
        })
    }

    /// Resolve the configuration from already-read environment values.
    ///
    /// Missing values fall back to the defaults in [`crate::constants`].
    pub fn from_env_values(
        api_base: Option<String>,
        download_dir: Option<String>,
        notice_ttl_secs: Option<String>,
    ) -> ConfigResult<Self> {
        let api_base = non_empty(api_base).unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
        let download_dir =
            PathBuf::from(non_empty(download_dir).unwrap_or_else(|| DEFAULT_DOWNLOAD_DIR.into()));
        let notice_ttl = notice_ttl_from_env_value(notice_ttl_secs)?;

        Self::new(&api_base, download_dir, notice_ttl)
    }

    /// Returns a copy with the API base and/or download directory overridden.
    pub fn with_overrides(
        &self,
        api_base: Option<&str>,
        download_dir: Option<PathBuf>,
    ) -> ConfigResult<Self> {
        Self::new(
            api_base.unwrap_or(&self.api_base),
            download_dir.unwrap_or_else(|| self.download_dir.clone()),
            self.notice_ttl,
        )
    }

    /// Base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn notice_ttl(&self) -> Duration {
        self.notice_ttl
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the notice lifetime (seconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default lifetime.
pub fn notice_ttl_from_env_value(value: Option<String>) -> ConfigResult<Duration> {
    let Some(value) = non_empty(value) else {
        return Ok(Duration::from_secs(DEFAULT_NOTICE_TTL_SECS));
    };

    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidInput(format!("invalid notice lifetime: {value}")))
}
