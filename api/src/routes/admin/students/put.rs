use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::services::bulk_import::derive_current_year;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::student;
use db::password::hash_password;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub department: Option<String>,
    pub semester: Option<i32>,
    /// Changing the admission year re-derives the current academic year.
    pub admission_year: Option<String>,
    pub roll_number: Option<String>,
    pub password: Option<String>,
}

/// PUT /api/admin/students/{id}
pub async fn update_student(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStudentRequest>,
) -> (StatusCode, Json<ApiResponse<Option<student::Model>>>) {
    let db = app_state.db();

    let existing = match student::Entity::find_by_id(id).one(db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Student not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "student lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    };

    let mut active = existing.into_active_model();
    if let Some(name) = req.name {
        active.name = Set(Some(name));
    }
    if let Some(department) = req.department {
        active.department = Set(Some(department.to_uppercase()));
    }
    if let Some(semester) = req.semester {
        active.semester = Set(Some(semester));
    }
    if let Some(admission_year) = req.admission_year {
        active.current_year = Set(derive_current_year(&admission_year));
        active.admission_year = Set(Some(admission_year));
    }
    if let Some(roll_number) = req.roll_number {
        active.roll_number = Set(Some(roll_number));
    }
    if let Some(password) = req.password {
        match hash_password(&password) {
            Ok(hash) => active.password_hash = Set(hash),
            Err(e) => {
                tracing::error!(error = %e, "password hashing failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error("Failed to update student")),
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
                AuditAction::UpdateStudent,
                json!({ "id": model.id, "student_id": model.student_id }),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    Some(model),
                    "Student updated successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "student update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to update student")),
            )
        }
    }
}
