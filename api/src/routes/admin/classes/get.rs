use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use db::models::class;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListClassesQuery {
    pub department: Option<String>,
    /// "Active" or "Ended".
    pub status: Option<String>,
}

/// GET /api/admin/classes?department&status
pub async fn list_classes(
    State(app_state): State<AppState>,
    Query(query): Query<ListClassesQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<class::Model>>>) {
    let mut condition = Condition::all();
    if let Some(department) = &query.department {
        condition = condition.add(class::Column::Department.eq(department.to_uppercase()));
    }
    if let Some(status) = &query.status {
        condition = condition.add(class::Column::Status.eq(status));
    }

    match class::Entity::find()
        .filter(condition)
        .order_by_asc(class::Column::ClassId)
        .all(app_state.db())
        .await
    {
        Ok(classes) => (
            StatusCode::OK,
            Json(ApiResponse::success(classes, "Classes retrieved successfully")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to list classes");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            )
        }
    }
}
