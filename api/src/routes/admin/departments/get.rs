use crate::response::ApiResponse;
use axum::{Json, extract::State, http::StatusCode};
use db::models::department;
use sea_orm::{EntityTrait, QueryOrder};
use util::state::AppState;

/// GET /api/admin/departments
///
/// All departments, ordered by name.
pub async fn list_departments(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<department::Model>>>) {
    match department::Entity::find()
        .order_by_asc(department::Column::Name)
        .all(app_state.db())
        .await
    {
        Ok(departments) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                departments,
                "Departments retrieved successfully",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to list departments");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            )
        }
    }
}
