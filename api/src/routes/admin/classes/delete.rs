use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::class;
use sea_orm::{EntityTrait, ModelTrait};
use serde_json::{Value, json};
use util::state::AppState;

/// DELETE /api/admin/classes/{id}
pub async fn delete_class(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Value>>) {
    let db = app_state.db();

    let existing = match class::Entity::find_by_id(id).one(db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Class not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "class lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    };

    let class_id = existing.class_id.clone();
    if let Err(e) = existing.delete(db).await {
        tracing::error!(error = %e, "class delete failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to delete class")),
        );
    }

    audit::record(
        db,
        claims.sub,
        AuditAction::DeleteClass,
        json!({ "id": id, "class_id": class_id }),
    )
    .await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            json!({ "id": id }),
            "Class deleted successfully",
        )),
    )
}
