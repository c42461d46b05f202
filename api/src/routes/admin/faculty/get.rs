use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use common::Paging;
use db::models::faculty;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListFacultyQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Partial match against faculty id or name.
    pub q: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct FacultyListResponse {
    pub faculty: Vec<faculty::Model>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

/// GET /api/admin/faculty?page&limit&q&department
pub async fn list_faculty(
    State(app_state): State<AppState>,
    Query(query): Query<ListFacultyQuery>,
) -> (StatusCode, Json<ApiResponse<FacultyListResponse>>) {
    let db = app_state.db();
    let paging = Paging {
        page: query.page,
        limit: query.limit,
    };
    let page = paging.page();
    let limit = paging.limit();

    let mut condition = Condition::all();
    if let Some(q) = &query.q {
        condition = condition.add(
            Condition::any()
                .add(faculty::Column::FacultyId.contains(q))
                .add(faculty::Column::Name.contains(q)),
        );
    }
    if let Some(department) = &query.department {
        condition = condition.add(faculty::Column::Department.eq(department.to_uppercase()));
    }

    let paginator = faculty::Entity::find()
        .filter(condition)
        .order_by_asc(faculty::Column::FacultyId)
        .paginate(db, limit);

    let (total, faculty) = match (paginator.num_items().await, paginator.fetch_page(page - 1).await)
    {
        (Ok(total), Ok(faculty)) => (total, faculty),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "failed to list faculty");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            FacultyListResponse {
                faculty,
                page,
                limit,
                total,
            },
            "Faculty retrieved successfully",
        )),
    )
}
