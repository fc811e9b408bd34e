use crate::{
    auth::middleware::AuthUser,
    types::{ApiResponse, OperationLogRecord, ProfileBasic},
    AppState,
};
use axum::{extract::State, Json};

pub async fn basic(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<ApiResponse<ProfileBasic>> {
    Json(ApiResponse::ok(
        state.store.profile_basic(),
        "Request successful",
    ))
}

pub async fn operation_log(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<ApiResponse<Vec<OperationLogRecord>>> {
    Json(ApiResponse::ok(
        state.store.operation_logs(),
        "Request successful",
    ))
}
