use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::student;
use sea_orm::{EntityTrait, ModelTrait};
use serde_json::{Value, json};
use util::state::AppState;

/// DELETE /api/admin/students/{id}
pub async fn delete_student(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Value>>) {
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

    let student_id = existing.student_id.clone();
    if let Err(e) = existing.delete(db).await {
        tracing::error!(error = %e, "student delete failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to delete student")),
        );
    }

    audit::record(
        db,
        claims.sub,
        AuditAction::DeleteStudent,
        json!({ "id": id, "student_id": student_id }),
    )
    .await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            json!({ "id": id }),
            "Student deleted successfully",
        )),
    )
}
