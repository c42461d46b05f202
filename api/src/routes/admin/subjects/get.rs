use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use db::models::subject;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListSubjectsQuery {
    /// Class identifier slug to filter by.
    pub class_id: Option<String>,
}

/// GET /api/admin/subjects?class_id
pub async fn list_subjects(
    State(app_state): State<AppState>,
    Query(query): Query<ListSubjectsQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<subject::Model>>>) {
    let mut condition = Condition::all();
    if let Some(class_id) = &query.class_id {
        condition = condition.add(subject::Column::ClassId.eq(class_id));
    }

    match subject::Entity::find()
        .filter(condition)
        .order_by_asc(subject::Column::Name)
        .all(app_state.db())
        .await
    {
        Ok(subjects) => (
            StatusCode::OK,
            Json(ApiResponse::success(subjects, "Subjects retrieved successfully")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to list subjects");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            )
        }
    }
}
