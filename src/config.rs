//! Backend endpoint and timeout configuration.
//!
//! Everything is resolved from CLI flags and environment variables; there is
//! no configuration file.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::error::ConfigError;

/// Default backend deployment.
pub const DEFAULT_BACKEND_URL: &str =
    "https://codescribe-backend-hihi33wfs-charanguttis-projects.vercel.app";

/// Environment variable overriding the backend base URL.
pub const BACKEND_URL_ENV_VAR: &str = "CODESCRIBE_BACKEND_URL";

/// Default timeout for a single generation request (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "CODESCRIBE_TIMEOUT";

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: Url,
    pub timeout: Duration,
    /// Workspace root, `None` when no usable workspace folder exists.
    pub workspace: Option<PathBuf>,
}

impl Config {
    /// Resolve configuration from an optional CLI override plus environment.
    pub fn resolve(
        backend_override: Option<&str>,
        workspace: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let raw = match backend_override {
            Some(url) => url.to_string(),
            None => env::var(BACKEND_URL_ENV_VAR)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
        };

        Ok(Self {
            backend_url: parse_backend_url(&raw)?,
            timeout: get_timeout(),
            workspace: workspace.and_then(resolve_workspace),
        })
    }
}

/// Parse and validate the backend base URL.
///
/// Only http and https are accepted. A trailing slash is appended so endpoint
/// paths join below the base instead of replacing its last segment.
pub fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBackendUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(invalid(format!("scheme \"{scheme}\" is not allowed"))),
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Get the configured request timeout.
///
/// Reads from CODESCRIBE_TIMEOUT if set, otherwise uses 30 seconds. Invalid
/// values are logged and ignored.
pub fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

fn resolve_workspace(path: &Path) -> Option<PathBuf> {
    if path.is_dir() {
        Some(path.to_path_buf())
    } else {
        warn!("Workspace {} is not a directory", path.display());
        None
    }
}
