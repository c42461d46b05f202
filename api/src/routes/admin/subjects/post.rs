use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{Extension, Json, extract::State, http::StatusCode};
use common::format_validation_errors;
use db::audit::{self, AuditAction};
use db::models::{class, subject};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1))]
    pub name: String,
    /// Class identifier slug the subject belongs to.
    #[validate(length(min = 1))]
    pub class_id: String,
}

/// POST /api/admin/subjects
pub async fn create_subject(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateSubjectRequest>,
) -> (StatusCode, Json<ApiResponse<Option<subject::Model>>>) {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&e))),
        );
    }

    let db = app_state.db();
    match class::Entity::find()
        .filter(class::Column::ClassId.eq(&req.class_id))
        .one(db)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Unknown class")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "class lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    }

    let created = subject::ActiveModel {
        name: Set(req.name),
        class_id: Set(req.class_id),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::CreateSubject,
                json!({ "id": model.id, "name": model.name, "class_id": model.class_id }),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    Some(model),
                    "Subject created successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "subject insert failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create subject")),
            )
        }
    }
}
