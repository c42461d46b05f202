use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::subject;
use sea_orm::{EntityTrait, ModelTrait};
use serde_json::{Value, json};
use util::state::AppState;

/// DELETE /api/admin/subjects/{id}
pub async fn delete_subject(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Value>>) {
    let db = app_state.db();

    let existing = match subject::Entity::find_by_id(id).one(db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Subject not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "subject lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    };

    let name = existing.name.clone();
    if let Err(e) = existing.delete(db).await {
        tracing::error!(error = %e, "subject delete failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to delete subject")),
        );
    }

    audit::record(
        db,
        claims.sub,
        AuditAction::DeleteSubject,
        json!({ "id": id, "name": name }),
    )
    .await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            json!({ "id": id }),
            "Subject deleted successfully",
        )),
    )
}
