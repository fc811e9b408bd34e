use crate::{
    api::extract::ApiJson,
    auth::middleware::AuthUser,
    types::{
        ActivityRecord, ApiResponse, AppError, BasicInfo, Certification, MenuItem,
        ProjectRecord, Result, TeamRecord, UserInfo,
    },
    AppState,
};
use axum::{extract::State, Json};

pub async fn info(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<UserInfo>>> {
    let info = state
        .store
        .user_info(&user.username)
        .ok_or_else(|| AppError::NotFound(format!("No profile for user '{}'", user.username)))?;

    Ok(Json(ApiResponse::ok(info, "Request successful")))
}

/// Menu entries restricted to other roles are left out.
pub async fn menu(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<ApiResponse<Vec<MenuItem>>> {
    Json(ApiResponse::ok(
        state.store.menu_for(&user.role),
        "Request successful",
    ))
}

pub async fn my_projects(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<ApiResponse<Vec<ProjectRecord>>> {
    Json(ApiResponse::ok(state.store.projects(), "Request successful"))
}

pub async fn my_teams(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<ApiResponse<Vec<TeamRecord>>> {
    Json(ApiResponse::ok(state.store.teams(), "Request successful"))
}

pub async fn latest_activity(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<ApiResponse<Vec<ActivityRecord>>> {
    Json(ApiResponse::ok(
        state.store.latest_activities(),
        "Request successful",
    ))
}

pub async fn save_info(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<BasicInfo>,
) -> Result<Json<ApiResponse<BasicInfo>>> {
    if payload.email.trim().is_empty() {
        return Err(AppError::InvalidInput("Email is required".to_string()));
    }
    if payload.nickname.trim().is_empty() {
        return Err(AppError::InvalidInput("Nickname is required".to_string()));
    }

    state.store.save_basic_info(&user.username, payload.clone());
    tracing::info!(username = %user.username, "basic info saved");

    Ok(Json(ApiResponse::ok(payload, "User information saved")))
}

pub async fn certification(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<ApiResponse<Certification>> {
    Json(ApiResponse::ok(
        state.store.certification(),
        "Request successful",
    ))
}
