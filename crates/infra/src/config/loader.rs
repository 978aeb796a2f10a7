//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Searches several paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `VKNET_APP_ID`: Registered application id
//! - `VKNET_SCOPES`: Comma-separated permission names (`friends,audio`)
//!
//! Optional:
//! - `VKNET_API_BASE`: API base URL
//! - `VKNET_OAUTH_HOST`: Authorization host
//! - `VKNET_TIMEOUT`: Request timeout in seconds
//! - `VKNET_EMAIL` / `VKNET_PASSWORD`: Credentials for automatic login
//! - `VKNET_LOGIN_TIMEOUT`: Manual login deadline in seconds
//! - `VKNET_ACCESS_TOKEN` / `VKNET_USER_ID` / `VKNET_EXPIRES_IN`: Pre-issued
//!   session
//! - `VKNET_ISSUED_AT`: RFC 3339 issue time of the pre-issued session
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./vknet.toml` or `./vknet.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use vknet_domain::{ApiConfig, AppConfig, AuthConfig, Result, VkConfig, VkNetError};

const CONFIG_FILE_NAMES: [&str; 4] = ["vknet.toml", "vknet.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `VkNetError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<VkConfig> {
    // Try loading from environment first
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            // Fall back to file
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `VKNET_APP_ID` and `VKNET_SCOPES` must be present; everything else falls
/// back to defaults.
///
/// # Errors
/// Returns `VkNetError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<VkConfig> {
    let app_id = env_var("VKNET_APP_ID").and_then(|s| parse_value("VKNET_APP_ID", &s))?;
    let scopes = env_var("VKNET_SCOPES")?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let defaults = ApiConfig::default();
    let api = ApiConfig {
        base_url: env_opt("VKNET_API_BASE").unwrap_or(defaults.base_url),
        oauth_host: env_opt("VKNET_OAUTH_HOST").unwrap_or(defaults.oauth_host),
        timeout_secs: env_parse("VKNET_TIMEOUT")?.unwrap_or(defaults.timeout_secs),
        user_agent: defaults.user_agent,
    };

    let auth_defaults = AuthConfig::default();
    let auth = AuthConfig {
        email: env_opt("VKNET_EMAIL"),
        password: env_opt("VKNET_PASSWORD"),
        poll_interval_ms: auth_defaults.poll_interval_ms,
        login_timeout_secs: env_parse("VKNET_LOGIN_TIMEOUT")?,
        access_token: env_opt("VKNET_ACCESS_TOKEN"),
        user_id: env_parse("VKNET_USER_ID")?,
        expires_in: env_parse("VKNET_EXPIRES_IN")?.unwrap_or(auth_defaults.expires_in),
        issued_at: env_parse("VKNET_ISSUED_AT")?,
    };

    Ok(VkConfig { app: AppConfig { app_id, scopes }, api, auth })
}

/// Load configuration from a file
///
/// If `path` is `None`, searches several locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`find_config_file`].
///
/// # Errors
/// Returns `VkNetError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<VkConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(VkNetError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            VkNetError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VkNetError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `VkNetError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<VkConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| VkNetError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| VkNetError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(VkNetError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing configuration file among the search paths
///
/// Searches the current working directory, its parent and grandparent, then
/// the same three levels starting from the executable's directory.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_file() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| [root.clone(), root.join(".."), root.join("../..")])
        .flat_map(|dir| CONFIG_FILE_NAMES.map(|name| dir.join(name)))
        .find(|path| path.exists())
}

/// Poll interval and login deadline from an [`AuthConfig`].
#[must_use]
pub fn login_timing(auth: &AuthConfig) -> (Duration, Option<Duration>) {
    (
        Duration::from_millis(auth.poll_interval_ms),
        auth.login_timeout_secs.map(Duration::from_secs),
    )
}

/// Get required environment variable
///
/// # Errors
/// Returns `VkNetError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| VkNetError::Config(format!("Missing required environment variable: {key}")))
}

/// Optional, non-empty environment variable.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Optional environment variable parsed into `T`.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    env_opt(key).map(|raw| parse_value(key, &raw)).transpose()
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| VkNetError::Config(format!("Invalid value for {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};
    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 12] = [
        "VKNET_APP_ID",
        "VKNET_SCOPES",
        "VKNET_API_BASE",
        "VKNET_OAUTH_HOST",
        "VKNET_TIMEOUT",
        "VKNET_EMAIL",
        "VKNET_PASSWORD",
        "VKNET_LOGIN_TIMEOUT",
        "VKNET_ACCESS_TOKEN",
        "VKNET_USER_ID",
        "VKNET_EXPIRES_IN",
        "VKNET_ISSUED_AT",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        (temp_file, path)
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("VKNET_APP_ID", "2951857");
        std::env::set_var("VKNET_SCOPES", "friends, audio,offline");
        std::env::set_var("VKNET_API_BASE", "http://localhost:8080");
        std::env::set_var("VKNET_EMAIL", "me@example.com");
        std::env::set_var("VKNET_PASSWORD", "secret");
        std::env::set_var("VKNET_LOGIN_TIMEOUT", "120");
        std::env::set_var("VKNET_ACCESS_TOKEN", "tok");
        std::env::set_var("VKNET_USER_ID", "42");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.app.app_id, 2_951_857);
        assert_eq!(config.app.scopes, vec!["friends", "audio", "offline"]);
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.oauth_host, ApiConfig::default().oauth_host);
        assert_eq!(config.auth.email.as_deref(), Some("me@example.com"));
        assert_eq!(config.auth.login_timeout_secs, Some(120));
        assert_eq!(config.auth.user_id, Some(42));
        assert_eq!(config.auth.expires_in, 0);
    }

    #[test]
    fn test_load_from_env_issued_at() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("VKNET_APP_ID", "1");
        std::env::set_var("VKNET_SCOPES", "friends");
        std::env::set_var("VKNET_ISSUED_AT", "2012-03-01T12:00:00Z");
        let valid = load_from_env();

        std::env::set_var("VKNET_ISSUED_AT", "yesterday");
        let invalid = load_from_env();
        clear_env();

        let expected = Utc.with_ymd_and_hms(2012, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(valid.expect("config from env").auth.issued_at, Some(expected));
        assert!(matches!(invalid, Err(VkNetError::Config(_))));
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("VKNET_APP_ID", "1");
        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(VkNetError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("VKNET_APP_ID", "not-a-number");
        std::env::set_var("VKNET_SCOPES", "friends");
        let result = load_from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("VKNET_APP_ID"));
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[app]
app_id = 2951857
scopes = ["friends", "messages"]

[api]
base_url = "https://api.vk.com"
timeout_secs = 10

[auth]
email = "me@example.com"
login_timeout_secs = 300
"#;

        let (_temp, path) = temp_config(toml_content, "toml");
        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();

        let config = result.expect("config from TOML");
        assert_eq!(config.app.app_id, 2_951_857);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.auth.login_timeout_secs, Some(300));
        assert_eq!(config.auth.poll_interval_ms, AuthConfig::default().poll_interval_ms);
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "app": { "app_id": 7, "scopes": ["audio"] },
            "auth": { "access_token": "abc", "user_id": 3, "expires_in": 86400 }
        }"#;

        let (_temp, path) = temp_config(json_content, "json");
        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();

        let config = result.expect("config from JSON");
        assert_eq!(config.app.scopes, vec!["audio"]);
        assert_eq!(config.auth.access_token.as_deref(), Some("abc"));
        assert_eq!(config.auth.expires_in, 86_400);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/vknet.toml")));
        assert!(matches!(result, Err(VkNetError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let (_temp, path) = temp_config(r#"{ "this is": "not valid json" "#, "json");
        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();

        assert!(result.is_err(), "Should fail with invalid JSON");
    }

    #[test]
    fn test_parse_config_unsupported_extension() {
        let result = parse_config("app_id: 1", Path::new("vknet.yaml"));
        assert!(matches!(result, Err(VkNetError::Config(msg)) if msg.contains("yaml")));
    }

    #[test]
    fn test_login_timing() {
        let auth = AuthConfig { poll_interval_ms: 500, login_timeout_secs: Some(60), ..AuthConfig::default() };
        assert_eq!(
            login_timing(&auth),
            (Duration::from_millis(500), Some(Duration::from_secs(60)))
        );
    }
}
