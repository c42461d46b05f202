use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::{class, faculty};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde::Deserialize;
use serde_json::json;
use util::events::Notification;
use util::state::AppState;

/// PATCH /api/admin/classes/{id}/end
///
/// Marks the class ended and broadcasts `CLASS_ENDED` to connected admins.
/// Ending an already-ended class is a `400`.
pub async fn end_class(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<class::Model>>>) {
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

    if existing.status == "Ended" {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Class already ended")),
        );
    }

    let mut active = existing.into_active_model();
    active.status = Set("Ended".to_string());
    active.ended_at = Set(Some(chrono::Utc::now()));
    active.updated_at = Set(chrono::Utc::now());

    match active.update(db).await {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::EndClass,
                json!({ "class_id": model.class_id }),
            )
            .await;
            app_state
                .events()
                .publish(Notification::class_ended(&model.class_id, &model.class_name));
            (
                StatusCode::OK,
                Json(ApiResponse::success(Some(model), "Class ended successfully")),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "class end failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to end class")),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignFacultyRequest {
    pub faculty_id: i64,
}

/// PATCH /api/admin/classes/{id}/assign-faculty
pub async fn assign_faculty(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<AssignFacultyRequest>,
) -> (StatusCode, Json<ApiResponse<Option<class::Model>>>) {
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

    let assignee = match faculty::Entity::find_by_id(req.faculty_id).one(db).await {
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
    active.faculty_id = Set(Some(assignee.id));
    active.updated_at = Set(chrono::Utc::now());

    match active.update(db).await {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::AssignFacultyToClass,
                json!({ "class_id": model.class_id, "faculty_id": assignee.faculty_id }),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    Some(model),
                    "Faculty assigned successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "faculty assignment failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to assign faculty")),
            )
        }
    }
}
