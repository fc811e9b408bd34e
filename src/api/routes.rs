use crate::api::handlers::{auth, lists, materials, messages, profile, user};
use crate::auth::middleware::require_auth;
use crate::types::ApiResponse;
use crate::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the application router.
///
/// Protected routes sit behind [`require_auth`]; a request without a valid
/// bearer token never reaches their handlers.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/user/login", post(auth::login))
        .route("/user/logout", post(auth::logout))
        .route("/list/policy", get(lists::list_policies))
        .route("/list/quality-inspection", get(lists::list_quality_inspections))
        .route("/list/the-service", get(lists::list_services))
        .route("/list/rules-preset", get(lists::list_rules_presets));

    let protected_routes = Router::new()
        .route("/user/info", post(user::info))
        .route("/user/menu", post(user::menu))
        .route("/user/my-project/list", post(user::my_projects))
        .route("/user/my-team/list", post(user::my_teams))
        .route("/user/latest-activity", post(user::latest_activity))
        .route("/user/save-info", post(user::save_info))
        .route("/user/certification", post(user::certification))
        .route("/profile/basic", get(profile::basic))
        .route("/operation/log", get(profile::operation_log))
        .route("/message/list", post(messages::list_messages))
        .route("/message/read", post(messages::mark_read))
        .route("/chat/list", post(messages::list_chats))
        .route("/material/upload", post(materials::upload))
        .route("/material/list", post(materials::list))
        .route("/material/pending", post(materials::pending))
        .route("/material/review", post(materials::review))
        .route("/material/batch-review", post(materials::batch_review))
        .route("/material/statistics", post(materials::statistics))
        .route("/material/delete", post(materials::delete))
        .route("/material/ai-review", post(materials::ai_review))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api", public_routes.merge(protected_routes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn root() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok(
        json!({ "service": "bga-server", "version": env!("CARGO_PKG_VERSION") }),
        "Service is running",
    ))
}

async fn health_check() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok(json!({ "status": "healthy" }), "Healthy"))
}
