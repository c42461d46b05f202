use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::subject;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
}

/// PUT /api/admin/subjects/{id}
pub async fn update_subject(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSubjectRequest>,
) -> (StatusCode, Json<ApiResponse<Option<subject::Model>>>) {
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

    let mut active = existing.into_active_model();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    active.updated_at = Set(chrono::Utc::now());

    match active.update(db).await {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::UpdateSubject,
                json!({ "id": model.id, "name": model.name }),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    Some(model),
                    "Subject updated successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "subject update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to update subject")),
            )
        }
    }
}
