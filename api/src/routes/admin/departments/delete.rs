use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::department;
use sea_orm::{EntityTrait, ModelTrait};
use serde_json::{Value, json};
use util::state::AppState;

/// DELETE /api/admin/departments/{id}
pub async fn delete_department(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Value>>) {
    let db = app_state.db();

    let existing = match department::Entity::find_by_id(id).one(db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Department not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "department lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    };

    let did = existing.did.clone();
    if let Err(e) = existing.delete(db).await {
        tracing::error!(error = %e, "department delete failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to delete department")),
        );
    }

    audit::record(db, claims.sub, AuditAction::DeleteDepartment, json!({ "id": id, "did": did }))
        .await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            json!({ "id": id }),
            "Department deleted successfully",
        )),
    )
}
