//! Configuration loading and backend origin resolution
//!
//! Bootstrap configuration only: everything here is read once at startup.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (--backend-url, --port, --config)
//! 2. Environment variables (STEMVIEW_BACKEND_URL, STEMVIEW_CONFIG)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Address of the analysis backend when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Environment variable overriding the backend origin
pub const BACKEND_URL_ENV: &str = "STEMVIEW_BACKEND_URL";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "STEMVIEW_CONFIG";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Origin of the analysis backend (scheme + host + port)
    #[serde(default)]
    pub backend_url: Option<String>,

    /// HTTP port of the stemview UI server
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upload request timeout; separation of long songs is slow
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Decorative progress bar settings
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            progress: ProgressConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Simulated progress indicator settings
///
/// The bar advances `step` percent every `tick_ms` and never passes `cap`
/// until the real response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_step")]
    pub step: u8,
    #[serde(default = "default_cap")]
    pub cap: u8,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            step: default_step(),
            cap: default_cap(),
        }
    }
}

impl ProgressConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    5790
}

fn default_request_timeout_secs() -> u64 {
    600
}

fn default_tick_ms() -> u64 {
    500
}

fn default_step() -> u8 {
    1
}

fn default_cap() -> u8 {
    90
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Locate the TOML config file
///
/// Priority: CLI path → `STEMVIEW_CONFIG` → `<config_dir>/stemview/config.toml`.
/// Returns `None` when no candidate can be determined.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("stemview").join("config.toml"))
}

/// Load TOML configuration, falling back to defaults when the file is absent
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        debug!("No config file location available, using built-in defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        debug!("Config file {} not found, using built-in defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;

    if config.progress.cap > 100 {
        return Err(Error::Config(format!(
            "progress.cap must be at most 100, got {}",
            config.progress.cap
        )));
    }

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Resolve the backend origin
///
/// **Priority:** CLI → ENV → TOML → built-in default
///
/// The returned origin never carries a trailing slash so relative media
/// paths (`/stems/drums.wav`) can be appended directly.
pub fn resolve_backend_url(cli_arg: Option<&str>, toml_config: &TomlConfig) -> Result<String> {
    let (source, raw) = if let Some(url) = cli_arg.filter(|u| !u.trim().is_empty()) {
        ("command line", url.to_string())
    } else if let Some(url) = std::env::var(BACKEND_URL_ENV)
        .ok()
        .filter(|u| !u.trim().is_empty())
    {
        ("environment", url)
    } else if let Some(url) = toml_config
        .backend_url
        .as_ref()
        .filter(|u| !u.trim().is_empty())
    {
        ("TOML", url.clone())
    } else {
        ("default", DEFAULT_BACKEND_URL.to_string())
    };

    let url = normalize_origin(&raw)?;
    info!("Analysis backend: {} (from {})", url, source);
    Ok(url)
}

/// Validate scheme and strip trailing slashes
pub fn normalize_origin(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::InvalidInput(format!(
            "backend URL must start with http:// or https://, got '{}'",
            raw
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_progress_settings() {
        let config = TomlConfig::default();
        assert_eq!(config.progress.tick_ms, 500);
        assert_eq!(config.progress.step, 1);
        assert_eq!(config.progress.cap, 90);
        assert_eq!(config.logging.level, "info");
        assert!(config.backend_url.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_toml_config(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config.port, 5790);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "backend_url = \"http://analysis.local:9000/\"").unwrap();
        writeln!(file, "[progress]").unwrap();
        writeln!(file, "tick_ms = 100").unwrap();

        let config = load_toml_config(Some(&path)).unwrap();
        assert_eq!(config.backend_url.as_deref(), Some("http://analysis.local:9000/"));
        assert_eq!(config.progress.tick_ms, 100);
        assert_eq!(config.progress.step, 1);
        assert_eq!(config.progress.cap, 90);
    }

    #[test]
    fn test_cap_above_100_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[progress]\ncap = 150\n").unwrap();

        assert!(matches!(load_toml_config(Some(&path)), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(matches!(load_toml_config(Some(&path)), Err(Error::Config(_))));
    }

    #[test]
    #[serial]
    fn test_backend_url_priority() {
        std::env::remove_var(BACKEND_URL_ENV);
        let mut toml_config = TomlConfig::default();

        assert_eq!(
            resolve_backend_url(None, &toml_config).unwrap(),
            DEFAULT_BACKEND_URL
        );

        toml_config.backend_url = Some("http://toml-host:8000/".to_string());
        assert_eq!(
            resolve_backend_url(None, &toml_config).unwrap(),
            "http://toml-host:8000"
        );

        std::env::set_var(BACKEND_URL_ENV, "http://env-host:8000");
        assert_eq!(
            resolve_backend_url(None, &toml_config).unwrap(),
            "http://env-host:8000"
        );

        assert_eq!(
            resolve_backend_url(Some("https://cli-host"), &toml_config).unwrap(),
            "https://cli-host"
        );

        std::env::remove_var(BACKEND_URL_ENV);
    }

    #[test]
    #[serial]
    fn test_config_path_from_env() {
        std::env::set_var(CONFIG_PATH_ENV, "/tmp/stemview-test.toml");
        assert_eq!(
            resolve_config_path(None),
            Some(PathBuf::from("/tmp/stemview-test.toml"))
        );
        assert_eq!(
            resolve_config_path(Some(Path::new("/etc/custom.toml"))),
            Some(PathBuf::from("/etc/custom.toml"))
        );
        std::env::remove_var(CONFIG_PATH_ENV);
    }

    #[test]
    fn test_normalize_origin_rejects_bad_scheme() {
        assert!(normalize_origin("ftp://host").is_err());
        assert!(normalize_origin("127.0.0.1:8000").is_err());
        assert_eq!(normalize_origin(" http://h:1// ").unwrap(), "http://h:1");
    }
}
