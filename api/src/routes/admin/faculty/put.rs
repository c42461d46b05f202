use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::faculty;
use db::password::hash_password;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateFacultyRequest {
    pub name: Option<String>,
    pub department: Option<String>,
    /// Re-hashed when present; an absent field leaves the password unchanged.
    pub password: Option<String>,
}

/// PUT /api/admin/faculty/{id}
pub async fn update_faculty(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateFacultyRequest>,
) -> (StatusCode, Json<ApiResponse<Option<faculty::Model>>>) {
    let db = app_state.db();

    let existing = match faculty::Entity::find_by_id(id).one(db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Faculty not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "faculty lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    };

    let mut active = existing.into_active_model();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(department) = req.department {
        active.department = Set(department.to_uppercase());
    }
    if let Some(password) = req.password {
        match hash_password(&password) {
            Ok(hash) => active.password_hash = Set(hash),
            Err(e) => {
                tracing::error!(error = %e, "password hashing failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error("Failed to update faculty")),
                );
            }
        }
    }
    active.updated_at = Set(chrono::Utc::now());

    match active.update(db).await {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::UpdateFaculty,
                json!({ "id": model.id, "faculty_id": model.faculty_id }),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    Some(model),
                    "Faculty updated successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "faculty update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to update faculty")),
            )
        }
    }
}
