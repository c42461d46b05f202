use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{Extension, Json, extract::State, http::StatusCode};
use common::format_validation_errors;
use db::audit::{self, AuditAction};
use db::models::department;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 2, max = 10))]
    pub did: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub hod: String,
}

/// POST /api/admin/departments
///
/// Creates a department. The DID is stored uppercased; a duplicate DID or
/// name is a `400`.
pub async fn create_department(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateDepartmentRequest>,
) -> (StatusCode, Json<ApiResponse<Option<department::Model>>>) {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&e))),
        );
    }

    let db = app_state.db();
    let did = req.did.to_uppercase();

    let duplicate = department::Entity::find()
        .filter(
            Condition::any()
                .add(department::Column::Did.eq(&did))
                .add(department::Column::Name.eq(&req.name)),
        )
        .one(db)
        .await;

    match duplicate {
        Ok(Some(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Department already exists")),
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "department duplicate check failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    }

    let created = department::ActiveModel {
        did: Set(did),
        name: Set(req.name),
        hod: Set(req.hod),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::CreateDepartment,
                json!({ "did": model.did, "name": model.name }),
            )
            .await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    Some(model),
                    "Department created successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "department insert failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create department")),
            )
        }
    }
}
