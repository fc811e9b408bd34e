mod common;

use axum::http::StatusCode;
use bga::types::codes;
use chrono::Duration;
use common::{bearer, create_test_app, login};
use rstest::rstest;
use serde_json::{json, Value};

fn code_of(body: &Value) -> u64 {
    body["code"].as_u64().expect("envelope should carry a code")
}

// ============= Public Endpoints =============

#[tokio::test]
async fn test_health_and_root() {
    let app = create_test_app();

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "healthy");

    let response = app.server.get("/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::SUCCESS as u64);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_success_shape() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/user/login")
        .json(&json!({ "username": "admin", "password": "admin" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(code_of(&body), 20000);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["username"], "admin");
    assert!(!body["data"]["token"].as_str().unwrap_or_default().is_empty());
    assert!(body["data"]["expiresAt"].is_string());
}

#[rstest]
#[case::wrong_password("admin", "nope")]
#[case::unknown_user("ghost", "ghost")]
#[case::inactive_user("former", "former")]
#[case::username_is_case_sensitive("Admin", "admin")]
#[tokio::test]
async fn test_login_rejected_uniformly(#[case] username: &str, #[case] password: &str) {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/user/login")
        .json(&json!({ "username": username, "password": password }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::INVALID_CREDENTIALS as u64);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["msg"], "Invalid username or password");
    assert!(body["data"].is_null());
}

#[rstest]
#[case::empty_username(json!({ "username": "", "password": "admin" }))]
#[case::empty_password(json!({ "username": "admin", "password": "" }))]
#[case::missing_fields(json!({}))]
#[tokio::test]
async fn test_login_requires_fields(#[case] payload: Value) {
    let app = create_test_app();

    let response = app.server.post("/api/user/login").json(&payload).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::ERROR as u64);
}

#[tokio::test]
async fn test_logout_is_public() {
    let app = create_test_app();
    let response = app.server.post("/api/user/logout").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_policy_list_paginates() {
    let app = create_test_app();

    let response = app
        .server
        .get("/api/list/policy")
        .add_query_param("current", 1)
        .add_query_param("pageSize", 2)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["total"], 4);
    assert_eq!(body["data"]["list"].as_array().map(Vec::len), Some(2));
}

// ============= Token Lifecycle =============

#[tokio::test]
async fn test_token_lifecycle_end_to_end() {
    let app = create_test_app();
    let token = login(&app.server, "admin", "admin").await;

    // Within the lifetime
    let response = app
        .server
        .post("/api/user/info")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["role"], "admin");

    // One second before expiry
    app.clock.advance(Duration::minutes(30) - Duration::seconds(1));
    app.server
        .post("/api/user/info")
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();

    // At expiry
    app.clock.advance(Duration::seconds(1));
    let response = app
        .server
        .post("/api/user/info")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::TOKEN_EXPIRED as u64);
}

#[tokio::test]
async fn test_tampered_token_is_illegal() {
    let app = create_test_app();
    let token = login(&app.server, "user", "user").await;

    let (head, signature) = token.rsplit_once('.').expect("three segments");
    let mut chars: Vec<char> = signature.chars().collect();
    chars[0] = if chars[0] == 'x' { 'y' } else { 'x' };
    let tampered = format!("{}.{}", head, chars.into_iter().collect::<String>());

    let response = app
        .server
        .post("/api/user/info")
        .add_header("Authorization", bearer(&tampered))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::ILLEGAL_TOKEN as u64);
}

#[rstest]
#[case::no_header(None, codes::MISSING_TOKEN)]
#[case::empty_bearer(Some("Bearer "), codes::MISSING_TOKEN)]
#[case::wrong_scheme(Some("Basic YWRtaW46YWRtaW4="), codes::MISSING_TOKEN)]
#[case::garbage(Some("Bearer garbage"), codes::MALFORMED_TOKEN)]
#[case::two_segments(Some("Bearer abc.def"), codes::MALFORMED_TOKEN)]
#[tokio::test]
async fn test_guard_rejections(#[case] header: Option<&str>, #[case] expected: u32) {
    let app = create_test_app();

    let mut request = app.server.post("/api/material/statistics");
    if let Some(value) = header {
        request = request.add_header("Authorization", value);
    }
    let response = request.await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(code_of(&body), expected as u64);
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_deactivated_account_loses_access() {
    let app = create_test_app();
    let token = login(&app.server, "reviewer", "reviewer").await;

    app.server
        .post("/api/material/pending")
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();

    app.users.set_active("reviewer", false);

    let response = app
        .server
        .post("/api/material/pending")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::INACTIVE_OR_UNKNOWN as u64);
}

#[tokio::test]
async fn test_lowercase_bearer_scheme_accepted() {
    let app = create_test_app();
    let token = login(&app.server, "user", "user").await;

    app.server
        .post("/api/user/menu")
        .add_header("Authorization", format!("bearer {}", token))
        .await
        .assert_status_ok();
}

// ============= Business Endpoints =============

#[tokio::test]
async fn test_menu_is_filtered_by_role() {
    let app = create_test_app();

    let count_children = |body: &Value| -> usize {
        body["data"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| item["children"].as_array().map(Vec::len).unwrap_or(0))
                    .sum()
            })
            .unwrap_or(0)
    };

    let admin = login(&app.server, "admin", "admin").await;
    let user = login(&app.server, "user", "user").await;

    let admin_menu: Value = app
        .server
        .post("/api/user/menu")
        .add_header("Authorization", bearer(&admin))
        .await
        .json();
    let user_menu: Value = app
        .server
        .post("/api/user/menu")
        .add_header("Authorization", bearer(&user))
        .await
        .json();

    assert!(count_children(&admin_menu) > count_children(&user_menu));
}

#[tokio::test]
async fn test_upload_then_review_flow() {
    let app = create_test_app();
    let user = login(&app.server, "user", "user").await;
    let reviewer = login(&app.server, "reviewer", "reviewer").await;

    let response = app
        .server
        .post("/api/material/upload")
        .add_header("Authorization", bearer(&user))
        .json(&json!({
            "title": "Spring banner",
            "description": "Homepage hero image",
            "category": "design",
            "tags": ["banner"],
            "files": ["banner.png"]
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["uploader"], "user");
    let id = body["data"]["id"].as_str().expect("id").to_string();

    // Plain users may not review
    let response = app
        .server
        .post("/api/material/review")
        .add_header("Authorization", bearer(&user))
        .json(&json!({ "materialId": id, "status": "approved" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::FORBIDDEN as u64);

    let response = app
        .server
        .post("/api/material/review")
        .add_header("Authorization", bearer(&reviewer))
        .json(&json!({ "materialId": id, "status": "approved", "comment": "Looks good" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["reviewer"], "reviewer");
    assert_eq!(body["data"]["reviewComment"], "Looks good");
}

#[tokio::test]
async fn test_review_rejects_pending_status() {
    let app = create_test_app();
    let admin = login(&app.server, "admin", "admin").await;

    let response = app
        .server
        .post("/api/material/review")
        .add_header("Authorization", bearer(&admin))
        .json(&json!({ "materialId": "2", "status": "pending" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_review_unknown_material() {
    let app = create_test_app();
    let admin = login(&app.server, "admin", "admin").await;

    let response = app
        .server
        .post("/api/material/review")
        .add_header("Authorization", bearer(&admin))
        .json(&json!({ "materialId": "missing", "status": "rejected" }))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_batch_review_skips_unknown_ids() {
    let app = create_test_app();
    let admin = login(&app.server, "admin", "admin").await;

    let response = app
        .server
        .post("/api/material/batch-review")
        .add_header("Authorization", bearer(&admin))
        .json(&json!({ "materialIds": ["2", "missing"], "status": "rejected" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["status"], "rejected");
}

#[tokio::test]
async fn test_delete_requires_uploader_or_admin() {
    let app = create_test_app();
    let user = login(&app.server, "user", "user").await;
    let admin = login(&app.server, "admin", "admin").await;

    // Material "1" belongs to admin
    app.server
        .post("/api/material/delete")
        .add_header("Authorization", bearer(&user))
        .json(&json!({ "materialId": "1" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    // Material "2" belongs to user
    app.server
        .post("/api/material/delete")
        .add_header("Authorization", bearer(&user))
        .json(&json!({ "materialId": "2" }))
        .await
        .assert_status_ok();

    app.server
        .post("/api/material/delete")
        .add_header("Authorization", bearer(&admin))
        .json(&json!({ "materialId": "1" }))
        .await
        .assert_status_ok();

    let body: Value = app
        .server
        .post("/api/material/statistics")
        .add_header("Authorization", bearer(&admin))
        .await
        .json();
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn test_material_list_filter() {
    let app = create_test_app();
    let token = login(&app.server, "user", "user").await;

    let all: Value = app
        .server
        .post("/api/material/list")
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(all["data"].as_array().map(Vec::len), Some(2));

    let approved: Value = app
        .server
        .post("/api/material/list")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "status": "approved" }))
        .await
        .json();
    assert_eq!(approved["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(approved["data"][0]["id"], "1");
}

#[tokio::test]
async fn test_mark_messages_read() {
    let app = create_test_app();
    let token = login(&app.server, "user", "user").await;

    let response = app
        .server
        .post("/api/message/read")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "ids": [1] }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let first = body["data"]
        .as_array()
        .and_then(|list| list.iter().find(|m| m["id"] == 1))
        .cloned()
        .expect("message 1 should exist");
    assert_eq!(first["status"], 1);
}

// ============= Request Validation =============

#[tokio::test]
async fn test_unknown_review_status_uses_envelope() {
    let app = create_test_app();
    let admin = login(&app.server, "admin", "admin").await;

    let response = app
        .server
        .post("/api/material/review")
        .add_header("Authorization", bearer(&admin))
        .json(&json!({ "materialId": "2", "status": "bogus" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::ERROR as u64);
    assert_eq!(body["status"], "fail");
    assert!(body["data"].is_null());
}

#[rstest]
#[case::upload("/api/material/upload", json!({ "title": 5 }))]
#[case::batch_review("/api/material/batch-review", json!({ "materialIds": "2", "status": "approved" }))]
#[case::delete("/api/material/delete", json!({}))]
#[case::mark_read("/api/message/read", json!({ "ids": ["one"] }))]
#[case::material_filter("/api/material/list", json!({ "status": "archived" }))]
#[tokio::test]
async fn test_bad_bodies_use_envelope(#[case] path: &str, #[case] payload: Value) {
    let app = create_test_app();
    let admin = login(&app.server, "admin", "admin").await;

    let response = app
        .server
        .post(path)
        .add_header("Authorization", bearer(&admin))
        .json(&payload)
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::ERROR as u64);
}

#[tokio::test]
async fn test_login_with_non_json_body_uses_envelope() {
    let app = create_test_app();

    let response = app.server.post("/api/user/login").text("admin:admin").await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::ERROR as u64);
}

#[tokio::test]
async fn test_bad_policy_query_uses_envelope() {
    let app = create_test_app();

    let response = app
        .server
        .get("/api/list/policy")
        .add_query_param("current", "first")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::ERROR as u64);
}

// ============= User Center and Lists =============

#[rstest]
#[case::quality_inspection("/api/list/quality-inspection", "quality-inspection")]
#[case::the_service("/api/list/the-service", "user-service")]
#[case::rules_preset("/api/list/rules-preset", "basic-rules")]
#[tokio::test]
async fn test_static_lists_are_public(#[case] path: &str, #[case] first_name: &str) {
    let app = create_test_app();

    let response = app.server.get(path).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"][0]["name"], first_name);
}

#[rstest]
#[case::my_projects("/api/user/my-project/list", 2)]
#[case::my_teams("/api/user/my-team/list", 2)]
#[case::latest_activity("/api/user/latest-activity", 2)]
#[tokio::test]
async fn test_user_center_panels(#[case] path: &str, #[case] expected: usize) {
    let app = create_test_app();

    app.server.post(path).await.assert_status_unauthorized();

    let token = login(&app.server, "user", "user").await;
    let response = app
        .server
        .post(path)
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(expected));
}

#[tokio::test]
async fn test_certification() {
    let app = create_test_app();
    let token = login(&app.server, "user", "user").await;

    let response = app
        .server
        .post("/api/user/certification")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["enterpriseInfo"]["authenticationNumber"], "CERT123456");
    assert_eq!(body["data"]["record"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_save_info() {
    let app = create_test_app();
    let token = login(&app.server, "user", "user").await;

    let response = app
        .server
        .post("/api/user/save-info")
        .add_header("Authorization", bearer(&token))
        .json(&json!({
            "email": "user@example.com",
            "nickname": "reader",
            "countryRegion": "China",
            "area": "Shanghai",
            "address": "",
            "profile": "Hello"
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["nickname"], "reader");
    assert_eq!(body["data"]["countryRegion"], "China");

    let response = app
        .server
        .post("/api/user/save-info")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "email": "", "nickname": "reader" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_profile_and_operation_log_are_guarded() {
    let app = create_test_app();

    app.server.get("/api/profile/basic").await.assert_status_unauthorized();
    app.server.get("/api/operation/log").await.assert_status_unauthorized();

    let token = login(&app.server, "user", "user").await;

    let body: Value = app
        .server
        .get("/api/profile/basic")
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(body["data"]["status"], 200);
    assert_eq!(body["data"]["audio"]["encoding"]["rate"], 44100);

    let body: Value = app
        .server
        .get("/api/operation/log")
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["data"][0]["contentNumber"], "CONT001");
}

#[tokio::test]
async fn test_ai_review_attaches_result() {
    let app = create_test_app();
    let token = login(&app.server, "user", "user").await;

    let response = app
        .server
        .post("/api/material/ai-review")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "materialId": "2" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let score = body["data"]["score"].as_u64().expect("score");
    assert!(body["data"]["riskLevel"].is_string());

    let list: Value = app
        .server
        .post("/api/material/list")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "uploader": "user" }))
        .await
        .json();
    assert_eq!(list["data"][0]["aiReviewResult"]["score"].as_u64(), Some(score));

    app.server
        .post("/api/material/ai-review")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "materialId": "missing" }))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_unknown_material_is_not_found() {
    let app = create_test_app();
    let admin = login(&app.server, "admin", "admin").await;

    let response = app
        .server
        .post("/api/material/delete")
        .add_header("Authorization", bearer(&admin))
        .json(&json!({ "materialId": "missing" }))
        .await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(code_of(&body), codes::ERROR as u64);
}
