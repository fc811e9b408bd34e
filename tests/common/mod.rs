//! Shared fixtures for integration tests.

#![allow(dead_code)]

use axum_test::TestServer;
use bga::{
    api::routes::create_router,
    auth::{
        clock::ManualClock,
        credentials::{hash_password, InMemoryCredentialStore, UserRecord},
        jwt::TokenService,
        AuthService,
    },
    types::Role,
    AppState, BgaConfig, MockStore,
};
use chrono::Duration;
use std::sync::Arc;

pub const SECRET: &[u8] = b"integration-test-secret-32-bytes-long";
pub const START: i64 = 1_700_000_000;

pub struct TestApp {
    pub server: TestServer,
    pub clock: Arc<ManualClock>,
    pub users: Arc<InMemoryCredentialStore>,
}

/// Server with admin, user and reviewer accounts whose password equals the
/// username, plus a deactivated `former` account.
pub fn create_test_app() -> TestApp {
    let clock = Arc::new(ManualClock::from_unix_secs(START));
    let tokens = TokenService::with_clock(SECRET, Duration::minutes(30), clock.clone())
        .expect("should build token service");

    let users = Arc::new(
        InMemoryCredentialStore::from_records(
            [
                ("admin", Role::Admin, true),
                ("user", Role::User, true),
                ("reviewer", Role::Reviewer, true),
                ("former", Role::User, false),
            ]
            .into_iter()
            .map(|(name, role, active)| UserRecord {
                username: name.to_string(),
                password_hash: hash_password(name).expect("should hash"),
                role,
                active,
            }),
        )
        .expect("should build credential store"),
    );

    let auth = AuthService::new(users.clone(), Arc::new(tokens));
    let state = AppState::new(BgaConfig::default(), auth, MockStore::seeded());
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");

    TestApp {
        server,
        clock,
        users,
    }
}

/// Logs in and returns the bearer token.
pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/api/user/login")
        .json(&serde_json::json!({ "username": username, "password": password }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    body["data"]["token"]
        .as_str()
        .expect("login response should carry a token")
        .to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
