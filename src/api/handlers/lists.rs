use crate::{
    api::extract::ApiQuery,
    types::{ApiResponse, PolicyList, PolicyQuery, ServiceRecord},
    AppState,
};
use axum::{extract::State, Json};

pub async fn list_policies(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PolicyQuery>,
) -> Json<ApiResponse<PolicyList>> {
    Json(ApiResponse::ok(
        state.store.policies(&query),
        "Request successful",
    ))
}

pub async fn list_quality_inspections(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<ServiceRecord>>> {
    Json(ApiResponse::ok(
        state.store.quality_inspections(),
        "Request successful",
    ))
}

pub async fn list_services(State(state): State<AppState>) -> Json<ApiResponse<Vec<ServiceRecord>>> {
    Json(ApiResponse::ok(state.store.services(), "Request successful"))
}

pub async fn list_rules_presets(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<ServiceRecord>>> {
    Json(ApiResponse::ok(
        state.store.rules_presets(),
        "Request successful",
    ))
}
