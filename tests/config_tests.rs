//! Startup wiring: configuration file to a running router.

use axum_test::TestServer;
use bga::{api::routes::create_router, AppState, BgaConfig, ConfigError};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(secret_env: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("should create temp file");
    write!(
        file,
        r#"
[server]
port = 0

[auth]
jwt_secret_env = "{secret_env}"
token_ttl_minutes = 5

[[users]]
username = "admin"
role = "admin"
password = "admin"

[[users]]
username = "disabled"
role = "user"
active = false
password = "disabled"
"#
    )
    .expect("should write config");
    file
}

#[tokio::test]
async fn test_startup_from_config_file() {
    // Unique per test so parallel tests never share the variable
    let env_name = "BGA_CONFIG_TEST_SECRET_STARTUP";
    std::env::set_var(env_name, "config-test-secret-value-with-32-bytes");

    let file = write_config(env_name);
    let config = BgaConfig::load(file.path()).expect("should load");
    let state = AppState::from_config(config).expect("should build state");
    let server = TestServer::new(create_router(state)).expect("should start");

    let response = server
        .post("/api/user/login")
        .json(&json!({ "username": "admin", "password": "admin" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let token = body["data"]["token"].as_str().expect("token").to_string();

    server
        .post("/api/material/statistics")
        .add_header("Authorization", format!("Bearer {}", token))
        .await
        .assert_status_ok();

    server
        .post("/api/user/login")
        .json(&json!({ "username": "disabled", "password": "disabled" }))
        .await
        .assert_status_unauthorized();
}

#[test]
fn test_startup_fails_without_secret() {
    let env_name = "BGA_CONFIG_TEST_SECRET_NEVER_SET";
    std::env::remove_var(env_name);

    let file = write_config(env_name);
    let config = BgaConfig::load(file.path()).expect("should load");

    match AppState::from_config(config) {
        Err(ConfigError::MissingEnvVar(name)) => assert_eq!(name, env_name),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("startup should fail without a secret"),
    }
}

#[test]
fn test_startup_fails_with_empty_secret() {
    let env_name = "BGA_CONFIG_TEST_SECRET_EMPTY";
    std::env::set_var(env_name, "");

    let file = write_config(env_name);
    let config = BgaConfig::load(file.path()).expect("should load");

    assert!(matches!(
        AppState::from_config(config),
        Err(ConfigError::MissingEnvVar(_))
    ));
}
