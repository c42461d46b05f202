use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use common::Paging;
use db::models::student;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListStudentsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Partial match against student id or name.
    pub q: Option<String>,
    pub department: Option<String>,
    pub approved: Option<bool>,
}

#[derive(Debug, Serialize, Default)]
pub struct StudentListResponse {
    pub students: Vec<student::Model>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

/// GET /api/admin/students?page&limit&q&department&approved
pub async fn list_students(
    State(app_state): State<AppState>,
    Query(query): Query<ListStudentsQuery>,
) -> (StatusCode, Json<ApiResponse<StudentListResponse>>) {
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
                .add(student::Column::StudentId.contains(q))
                .add(student::Column::Name.contains(q)),
        );
    }
    if let Some(department) = &query.department {
        condition = condition.add(student::Column::Department.eq(department.to_uppercase()));
    }
    if let Some(approved) = query.approved {
        condition = condition.add(student::Column::IsApproved.eq(approved));
    }

    let paginator = student::Entity::find()
        .filter(condition)
        .order_by_asc(student::Column::StudentId)
        .paginate(db, limit);

    let (total, students) = match (paginator.num_items().await, paginator.fetch_page(page - 1).await)
    {
        (Ok(total), Ok(students)) => (total, students),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "failed to list students");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            StudentListResponse {
                students,
                page,
                limit,
                total,
            },
            "Students retrieved successfully",
        )),
    )
}
