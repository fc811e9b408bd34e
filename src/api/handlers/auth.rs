use crate::{
    api::extract::ApiJson,
    types::{ApiResponse, LoginRequest, LoginResponse, Result},
    AppState,
};
use axum::{extract::State, Json};

/// Login with username and password
///
/// Empty fields are rejected as invalid input; a wrong password, an unknown
/// user and a deactivated account all produce the same
/// `InvalidCredentials` response.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    let login = state
        .auth
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::ok(login, "Login successful")))
}

/// Tokens are not revoked server-side; the client discards its copy.
pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::empty("Logout successful"))
}
