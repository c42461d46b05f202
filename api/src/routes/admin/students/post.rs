use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::services::bulk_import::derive_current_year;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use common::format_validation_errors;
use db::audit::{self, AuditAction};
use db::models::{class, student};
use db::password::hash_password;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1))]
    pub student_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub department: Option<String>,
    pub admission_year: Option<String>,
    pub roll_number: Option<String>,
    #[validate(range(min = 1, max = 12))]
    pub semester: Option<i32>,
}

/// POST /api/admin/students
///
/// Admin-provisioned students are approved immediately. The current academic
/// year is derived from the admission year the same way the bulk import does
/// it; the roll number falls back to the student id.
pub async fn create_student(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateStudentRequest>,
) -> (StatusCode, Json<ApiResponse<Option<student::Model>>>) {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&e))),
        );
    }

    let db = app_state.db();
    match student::Entity::find()
        .filter(student::Column::StudentId.eq(&req.student_id))
        .one(db)
        .await
    {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error("Student ID already exists")),
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "student duplicate check failed");
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
                Json(ApiResponse::error("Failed to create student")),
            );
        }
    };

    let current_year = req.admission_year.as_deref().and_then(derive_current_year);
    let roll_number = req.roll_number.unwrap_or_else(|| req.student_id.clone());

    let created = student::ActiveModel {
        student_id: Set(req.student_id),
        name: Set(Some(req.name)),
        password_hash: Set(password_hash),
        is_approved: Set(true),
        department: Set(req.department.map(|d| d.to_uppercase())),
        semester: Set(req.semester),
        admission_year: Set(req.admission_year),
        roll_number: Set(Some(roll_number)),
        current_year: Set(current_year),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::CreateStudent,
                json!({ "student_id": model.student_id }),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    Some(model),
                    "Student created successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "student insert failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create student")),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EnrollStudentRequest {
    pub class_id: i64,
}

/// POST /api/admin/students/{id}/enroll
///
/// Enrolls the student in an active class; the student inherits the class's
/// semester. Enrolling in an ended class is a `400`.
pub async fn enroll_student(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<EnrollStudentRequest>,
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

    let target = match class::Entity::find_by_id(req.class_id).one(db).await {
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

    if target.status != "Active" {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Cannot enroll in an ended class")),
        );
    }

    let mut active = existing.into_active_model();
    active.class_id = Set(Some(target.id));
    active.semester = Set(Some(target.semester));
    active.updated_at = Set(chrono::Utc::now());

    match active.update(db).await {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::EnrollStudent,
                json!({ "student_id": model.student_id, "class_id": target.class_id }),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    Some(model),
                    "Student enrolled successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "student enroll failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to enroll student")),
            )
        }
    }
}
