use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::admin::classes::common::{class_slug, parity_matches, unique_class_id};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::{class, department};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateClassRequest {
    /// Bare class name without the department suffix.
    pub class_name: Option<String>,
    pub department: Option<String>,
    pub semester: Option<i32>,
    pub term_year: Option<String>,
    pub odd_even: Option<String>,
}

/// PUT /api/admin/classes/{id}
///
/// Partial update. Changing the name, department, or semester regenerates
/// the class identifier slug.
pub async fn update_class(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateClassRequest>,
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

    let semester = req.semester.unwrap_or(existing.semester);
    let odd_even = req.odd_even.clone().unwrap_or_else(|| existing.odd_even.clone());
    if !parity_matches(semester, &odd_even) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                "Semester number does not match the odd/even term",
            )),
        );
    }

    let did = req
        .department
        .as_ref()
        .map(|d| d.to_uppercase())
        .unwrap_or_else(|| existing.department.clone());

    // The stored display name carries the department suffix; recover the bare
    // name unless the caller supplies a new one.
    let bare_name = req.class_name.clone().unwrap_or_else(|| {
        existing
            .class_name
            .split(" - ")
            .next()
            .unwrap_or(&existing.class_name)
            .to_string()
    });

    let key_changed = req.class_name.is_some()
        || req.department.is_some()
        || req.semester.is_some();

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

    let mut active = existing.clone().into_active_model();
    if key_changed {
        let base = class_slug(&did, &bare_name, semester);
        let class_id = match unique_class_id(db, &base, semester, Some(id)).await {
            Ok(slug) => slug,
            Err(e) => {
                tracing::error!(error = %e, "class id generation failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error("Database error")),
                );
            }
        };
        active.class_id = Set(class_id);
        active.class_name = Set(format!("{} - {}", bare_name, dept.name));
        active.department = Set(did);
        active.semester = Set(semester);
    }
    if let Some(term_year) = req.term_year {
        active.term_year = Set(term_year);
    }
    active.odd_even = Set(odd_even);
    active.updated_at = Set(chrono::Utc::now());

    match active.update(db).await {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::UpdateClass,
                json!({ "id": model.id, "class_id": model.class_id }),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    Some(model),
                    "Class updated successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "class update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to update class")),
            )
        }
    }
}
