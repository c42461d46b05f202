use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::admin::classes::common::{class_slug, parity_matches, unique_class_id};
use axum::{Extension, Json, extract::State, http::StatusCode};
use common::format_validation_errors;
use db::audit::{self, AuditAction};
use db::models::{class, department};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassRequest {
    #[validate(length(min = 1))]
    pub class_name: String,
    #[validate(length(min = 1))]
    pub department: String,
    #[validate(range(min = 1, max = 12))]
    pub semester: i32,
    #[validate(length(min = 4))]
    pub term_year: String,
    /// "Odd" or "Even"; must agree with the semester number.
    pub odd_even: String,
}

/// POST /api/admin/classes
///
/// Creates a class. The stored display name is `<name> - <department name>`
/// and the class identifier is a generated `DEPT-NAME-S<sem>` slug, suffixed
/// `-2`, `-3`, ... if taken within the same semester.
pub async fn create_class(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateClassRequest>,
) -> (StatusCode, Json<ApiResponse<Option<class::Model>>>) {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&e))),
        );
    }

    if !parity_matches(req.semester, &req.odd_even) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                "Semester number does not match the odd/even term",
            )),
        );
    }

    let db = app_state.db();
    let did = req.department.to_uppercase();
    let dept = match department::Entity::find()
        .filter(department::Column::Did.eq(&did))
        .one(db)
        .await
    {
        Ok(Some(model)) => model,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Unknown department")),
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

    let base = class_slug(&did, &req.class_name, req.semester);
    let class_id = match unique_class_id(db, &base, req.semester, None).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "class id generation failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    };

    let created = class::ActiveModel {
        class_id: Set(class_id),
        class_name: Set(format!("{} - {}", req.class_name, dept.name)),
        department: Set(did),
        term_year: Set(req.term_year),
        semester: Set(req.semester),
        odd_even: Set(req.odd_even),
        status: Set("Active".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::CreateClass,
                json!({ "class_id": model.class_id, "semester": model.semester }),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    Some(model),
                    "Class created successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "class insert failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create class")),
            )
        }
    }
}
