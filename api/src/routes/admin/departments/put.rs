use crate::auth::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::audit::{self, AuditAction};
use db::models::department;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateDepartmentRequest {
    pub did: Option<String>,
    pub name: Option<String>,
    pub hod: Option<String>,
}

/// PUT /api/admin/departments/{id}
///
/// Partial update; changing the DID or name checks for conflicts against
/// other departments.
pub async fn update_department(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDepartmentRequest>,
) -> (StatusCode, Json<ApiResponse<Option<department::Model>>>) {
    let db = app_state.db();

    let existing = match department::Entity::find_by_id(id).one(db).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Department not found")),
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

    let did = req.did.map(|d| d.to_uppercase());
    if did.is_some() || req.name.is_some() {
        let mut conflicts = Condition::any();
        if let Some(did) = &did {
            conflicts = conflicts.add(department::Column::Did.eq(did));
        }
        if let Some(name) = &req.name {
            conflicts = conflicts.add(department::Column::Name.eq(name));
        }
        let conflict = department::Entity::find()
            .filter(Condition::all().add(department::Column::Id.ne(id)).add(conflicts))
            .one(db)
            .await;
        match conflict {
            Ok(Some(_)) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error("Another department already uses that DID or name")),
                );
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "department conflict check failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error("Database error")),
                );
            }
        }
    }

    let mut active = existing.into_active_model();
    if let Some(did) = did {
        active.did = Set(did);
    }
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(hod) = req.hod {
        active.hod = Set(hod);
    }
    active.updated_at = Set(chrono::Utc::now());

    match active.update(db).await {
        Ok(model) => {
            audit::record(
                db,
                claims.sub,
                AuditAction::UpdateDepartment,
                json!({ "id": model.id, "did": model.did }),
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    Some(model),
                    "Department updated successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "department update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to update department")),
            )
        }
    }
}
