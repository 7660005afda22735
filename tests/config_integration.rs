use query_chat::config::{AppConfig, DEFAULT_BASE_URL, DEFAULT_CONFIG_FILE};
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("CONFIG_FILE");
        env::remove_var("ASK_BASE_URL");
        env::remove_var("QUERY_CHAT_BACKEND__BASE_URL");
        env::remove_var("QUERY_CHAT_BACKEND__TIMEOUT_SECS");
        env::remove_var("QUERY_CHAT_WIDGET__TITLE");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["query-chat"]).expect("defaults should load");
    assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.backend.ask_path, "/ask");
    assert_eq!(config.backend.timeout_secs, 60);
    assert_eq!(config.widget.title, "Assistant");
    assert!(!config.widget.page);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("QUERY_CHAT_BACKEND__TIMEOUT_SECS", "15");
        env::set_var("QUERY_CHAT_WIDGET__TITLE", "Sales Bot");
    }

    let config = AppConfig::load_from_args(["query-chat"]).expect("Failed to load config");
    assert_eq!(config.backend.timeout_secs, 15);
    assert_eq!(config.widget.title, "Sales Bot");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_env_beats_prefixed_env() {
    clear_env_vars();
    unsafe {
        env::set_var("QUERY_CHAT_BACKEND__BASE_URL", "http://from-prefixed:1");
        env::set_var("ASK_BASE_URL", "http://from-cli-env:2");
    }

    let config = AppConfig::load_from_args(["query-chat"]).expect("Failed to load config");
    assert_eq!(config.backend.base_url, "http://from-cli-env:2");

    let config = AppConfig::load_from_args(["query-chat", "--base-url", "http://from-flag:3"])
        .expect("Failed to load config");
    assert_eq!(config.backend.base_url, "http://from-flag:3");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = dir.path().join("chat.yaml");
    fs::write(
        &file_path,
        r#"
backend:
  base_url: "http://backend:7070"
  ask_path: "/invoke-agent"
widget:
  page: true
"#,
    )
    .expect("Failed to write temp config");

    // Point at the file the way a user would, via env
    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = AppConfig::load_from_args(["query-chat"]).expect("Failed to load config from file");
    assert_eq!(config.backend.base_url, "http://backend:7070");
    assert_eq!(config.backend.ask_path, "/invoke-agent");
    assert_eq!(config.backend.timeout_secs, 60);
    assert!(config.widget.page);

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["query-chat", "--config", "/nonexistent/chat.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    // No --config and no CONFIG_FILE: ./query-chat.yaml should be picked up
    let cwd_path = DEFAULT_CONFIG_FILE;
    fs::write(
        cwd_path,
        r#"
widget:
  title: "From working directory"
"#,
    )
    .expect("Failed to write ./query-chat.yaml");

    let config = AppConfig::load_from_args(["query-chat"]);

    // Clean up even if an assertion fails
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let config = config.expect("Failed to load config");
        assert_eq!(config.widget.title, "From working directory");
        assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
    }));

    fs::remove_file(cwd_path).unwrap();

    if let Err(e) = result {
        std::panic::resume_unwind(e);
    }
}
