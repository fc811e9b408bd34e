use crate::{
    api::extract::ApiJson,
    auth::middleware::AuthUser,
    types::{
        AiReviewResult, ApiResponse, AppError, BatchReviewRequest, Material, MaterialFilter,
        MaterialIdRequest, MaterialStatistics, MaterialStatus, Result, ReviewMaterialRequest,
        Role, UploadMaterialRequest,
    },
    AppState,
};
use axum::{extract::State, Json};

const REVIEWERS: &[Role] = &[Role::Admin, Role::Reviewer];

pub async fn upload(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<UploadMaterialRequest>,
) -> Result<Json<ApiResponse<Material>>> {
    if payload.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()));
    }
    if payload.category.trim().is_empty() {
        return Err(AppError::InvalidInput("Category is required".to_string()));
    }

    let material = state.store.add_material(payload, &user.username);
    tracing::info!(id = %material.id, uploader = %user.username, "material uploaded");

    Ok(Json(ApiResponse::ok(material, "Material uploaded")))
}

/// The filter body is optional; an empty body lists everything.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    filter: Option<ApiJson<MaterialFilter>>,
) -> Json<ApiResponse<Vec<Material>>> {
    let filter = filter.map(|ApiJson(f)| f).unwrap_or_default();
    Json(ApiResponse::ok(
        state.store.materials(&filter),
        "Request successful",
    ))
}

pub async fn pending(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<ApiResponse<Vec<Material>>> {
    let filter = MaterialFilter {
        status: Some(MaterialStatus::Pending),
        ..Default::default()
    };
    Json(ApiResponse::ok(
        state.store.materials(&filter),
        "Request successful",
    ))
}

pub async fn review(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<ReviewMaterialRequest>,
) -> Result<Json<ApiResponse<Material>>> {
    user.require_role(REVIEWERS)?;
    ensure_decision(payload.status)?;

    let material = state
        .store
        .review(
            &payload.material_id,
            payload.status,
            &user.0.username,
            payload.comment,
        )
        .ok_or_else(|| AppError::NotFound(format!("Material '{}'", payload.material_id)))?;

    tracing::info!(id = %material.id, reviewer = %user.0.username, status = ?material.status, "material reviewed");

    Ok(Json(ApiResponse::ok(material, "Review saved")))
}

pub async fn batch_review(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<BatchReviewRequest>,
) -> Result<Json<ApiResponse<Vec<Material>>>> {
    user.require_role(REVIEWERS)?;
    ensure_decision(payload.status)?;

    let reviewed = state.store.batch_review(
        &payload.material_ids,
        payload.status,
        &user.0.username,
        payload.comment,
    );

    Ok(Json(ApiResponse::ok(reviewed, "Batch review saved")))
}

pub async fn statistics(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<ApiResponse<MaterialStatistics>> {
    Json(ApiResponse::ok(
        state.store.statistics(),
        "Statistics retrieved",
    ))
}

/// Only the uploader or an admin may delete.
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<MaterialIdRequest>,
) -> Result<Json<ApiResponse<()>>> {
    let removed = state
        .store
        .delete_material(&payload.material_id, &user.username, &user.role)?;

    tracing::info!(id = %removed.id, by = %user.username, "material deleted");

    Ok(Json(ApiResponse::empty("Material deleted")))
}

/// Scores a material and stores the result on it.
pub async fn ai_review(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiJson(payload): ApiJson<MaterialIdRequest>,
) -> Result<Json<ApiResponse<AiReviewResult>>> {
    let result = state
        .store
        .ai_review(&payload.material_id)
        .ok_or_else(|| AppError::NotFound(format!("Material '{}'", payload.material_id)))?;

    Ok(Json(ApiResponse::ok(result, "AI review complete")))
}

fn ensure_decision(status: MaterialStatus) -> Result<()> {
    match status {
        MaterialStatus::Approved | MaterialStatus::Rejected => Ok(()),
        MaterialStatus::Pending => Err(AppError::InvalidInput(
            "Review status must be 'approved' or 'rejected'".to_string(),
        )),
    }
}
