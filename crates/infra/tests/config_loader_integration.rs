//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use tempfile::NamedTempFile;
use vknet_common::auth::Permission;
use vknet_infra::config;

fn write_config(contents: &str, extension: &str) -> (NamedTempFile, std::path::PathBuf) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    (temp_file, path)
}

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "app": {
            "app_id": 2951857,
            "scopes": ["friends", "messages", "offline"]
        },
        "api": {
            "base_url": "https://api.example.com",
            "oauth_host": "https://oauth.example.com",
            "timeout_secs": 15,
            "user_agent": "vknet-test"
        },
        "auth": {
            "email": "me@example.com",
            "password": "secret",
            "poll_interval_ms": 1000,
            "login_timeout_secs": 90
        }
    }"#;

    let (_temp, path) = write_config(json_content, "json");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();
    let config = result.expect("Failed to load config from JSON file");

    assert_eq!(config.app.app_id, 2_951_857);
    assert_eq!(
        config.app.permissions().expect("known scopes"),
        vec![Permission::Friends, Permission::Messages, Permission::Offline]
    );

    assert_eq!(config.api.base_url, "https://api.example.com");
    assert_eq!(config.api.oauth_host, "https://oauth.example.com");
    assert_eq!(config.api.timeout_secs, 15);
    assert_eq!(config.api.user_agent, "vknet-test");

    assert_eq!(config.auth.email.as_deref(), Some("me@example.com"));
    assert_eq!(config.auth.password.as_deref(), Some("secret"));
    assert_eq!(config.auth.poll_interval_ms, 1000);
    assert_eq!(config.auth.login_timeout_secs, Some(90));
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[app]
app_id = 42
scopes = ["audio"]

[auth]
access_token = "pre-issued"
user_id = 7
expires_in = 0
"#;

    let (_temp, path) = write_config(toml_content, "toml");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();
    let config = result.expect("Failed to load config from TOML file");

    assert_eq!(config.app.app_id, 42);
    assert_eq!(config.auth.access_token.as_deref(), Some("pre-issued"));
    assert_eq!(config.auth.user_id, Some(7));
    assert_eq!(config.auth.expires_in, 0);
    assert!(config.auth.email.is_none());
}

#[test]
fn test_unknown_scope_is_rejected_after_loading() {
    let (_temp, path) =
        write_config(r#"{ "app": { "app_id": 1, "scopes": ["everything"] } }"#, "json");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();
    let config = result.expect("scope names are validated lazily");

    assert!(config.app.permissions().is_err());
}

#[test]
fn test_missing_app_section_fails() {
    let (_temp, path) = write_config("[api]\ntimeout_secs = 5\n", "toml");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    assert!(result.is_err(), "app section is required");
}
