use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{Extension, Json, extract::State, http::StatusCode};
use common::format_validation_errors;
use db::audit::{self, AuditAction};
use db::models::faculty;
use db::password::hash_password;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFacultyRequest {
    #[validate(length(min = 1))]
    pub faculty_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub department: String,
    #[validate(length(min = 8))]
    pub password: String,
}

/// POST /api/admin/faculty
pub async fn create_faculty(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateFacultyRequest>,
) -> (StatusCode, Json<ApiResponse<Option<faculty::Model>>>) {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&e))),
        );
    }

    let db = app_state.db();
    match faculty::Entity::find()
        .filter(faculty::Column::FacultyId.eq(&req.faculty_id))
        .one(db)
        .await
    {
        Ok(Some(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Faculty ID already exists")),
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "faculty duplicate check failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    }

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "password hashing failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create faculty")),
            );
        }
    };

    let created = faculty::ActiveModel {
        faculty_id: Set(req.faculty_id),
        name: Set(req.name),
        department: Set(req.department.to_uppercase()),
        password_hash: Set(password_hash),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::CreateFaculty,
                json!({ "faculty_id": model.faculty_id }),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    Some(model),
                    "Faculty created successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "faculty insert failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create faculty")),
            )
        }
    }
}
