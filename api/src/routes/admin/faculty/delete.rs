use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::faculty;
use sea_orm::{EntityTrait, ModelTrait};
use serde_json::{Value, json};
use util::state::AppState;

/// DELETE /api/admin/faculty/{id}
pub async fn delete_faculty(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Value>>) {
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

    let faculty_id = existing.faculty_id.clone();
    if let Err(e) = existing.delete(db).await {
        tracing::error!(error = %e, "faculty delete failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to delete faculty")),
        );
    }

    audit::record(
        db,
        claims.sub,
        AuditAction::DeleteFaculty,
        json!({ "id": id, "faculty_id": faculty_id }),
    )
    .await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            json!({ "id": id }),
            "Faculty deleted successfully",
        )),
    )
}
