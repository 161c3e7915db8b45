//! Configuration loading and server URL resolution
//!
//! Missing configuration never stops the client: a missing TOML file logs a
//! warning and falls back to compiled defaults. A TOML file that exists but
//! cannot be parsed is reported as [`Error::Config`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the review server URL
pub const SERVER_URL_ENV: &str = "QAREV_SERVER_URL";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "QAREV_CONFIG";

/// Compiled default server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Logging section of the TOML config
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default tracing level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; stderr when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TomlConfig {
    /// Base URL of the review server, e.g. `http://127.0.0.1:5000`
    #[serde(default)]
    pub server_url: Option<String>,
    /// Opaque session cookie attached to every request
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Per-request timeout; no timeout when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default config file location: `<config dir>/qarev/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("qarev").join("config.toml"))
}

/// Resolve which config file to read
///
/// Priority: explicit path → `QAREV_CONFIG` → platform default.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    default_config_path()
}

/// Load the TOML config, falling back to defaults when the file is missing
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        warn!("No config directory available; using default configuration");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file not found at {}; using default configuration",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write the TOML config, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Server URL resolution following priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable `QAREV_SERVER_URL`
/// 3. TOML config `server_url`
/// 4. Compiled default (fallback)
///
/// The result has trailing slashes removed and must use http or https.
pub fn resolve_server_url(cli_arg: Option<&str>, toml_config: &TomlConfig) -> Result<String> {
    let env_value = std::env::var(SERVER_URL_ENV).ok();

    let (source, raw) = if let Some(url) = non_blank(cli_arg) {
        ("command line", url.to_string())
    } else if let Some(url) = non_blank(env_value.as_deref()) {
        ("environment", url.to_string())
    } else if let Some(url) = non_blank(toml_config.server_url.as_deref()) {
        ("TOML config", url.to_string())
    } else {
        ("compiled default", DEFAULT_SERVER_URL.to_string())
    };

    let url = normalize_server_url(&raw)?;
    debug!("Server URL {} (from {})", url, source);
    Ok(url)
}

/// Trim whitespace and trailing slashes, and require an http(s) scheme
pub fn normalize_server_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::InvalidInput(format!(
            "Server URL must start with http:// or https://: {}",
            raw
        )));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_trailing_slashes() {
        assert_eq!(
            normalize_server_url(" http://review.local:8080// ").unwrap(),
            "http://review.local:8080"
        );
    }

    #[test]
    fn test_normalize_rejects_missing_scheme() {
        let err = normalize_server_url("review.local").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_logging_defaults() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert!(logging.file.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("server_url = \"http://x\"").unwrap();
        assert_eq!(config.server_url.as_deref(), Some("http://x"));
        assert!(config.session_cookie.is_none());
        assert_eq!(config.logging, LoggingConfig::default());
    }
}
