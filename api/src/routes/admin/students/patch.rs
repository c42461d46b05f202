use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::student;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde_json::json;
use util::state::AppState;

/// PATCH /api/admin/students/{id}/approve
///
/// Marks a self-registered student as approved so they can log in.
/// Approving an already-approved student is a no-op `200`.
pub async fn approve_student(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
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

    if existing.is_approved {
        return (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(existing),
                "Student already approved",
            )),
        );
    }

    let mut active = existing.into_active_model();
    active.is_approved = Set(true);
    active.updated_at = Set(chrono::Utc::now());

    match active.update(db).await {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::ApproveStudent,
                json!({ "student_id": model.student_id }),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    Some(model),
                    "Student approved successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "student approve failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to approve student")),
            )
        }
    }
}
