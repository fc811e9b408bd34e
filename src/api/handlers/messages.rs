use crate::{
    api::extract::ApiJson,
    auth::middleware::AuthUser,
    types::{ApiResponse, ChatRecord, MessageRecord, MessageStatus},
    AppState,
};
use axum::{extract::State, Json};

pub async fn list_messages(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<ApiResponse<Vec<MessageRecord>>> {
    Json(ApiResponse::ok(state.store.messages(), "Request successful"))
}

pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<MessageStatus>,
) -> Json<ApiResponse<Vec<MessageRecord>>> {
    tracing::debug!(username = %user.username, ids = ?payload.ids, "marking messages read");
    Json(ApiResponse::ok(
        state.store.mark_read(&payload.ids),
        "Request successful",
    ))
}

pub async fn list_chats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<ApiResponse<Vec<ChatRecord>>> {
    Json(ApiResponse::ok(state.store.chats(), "Request successful"))
}
