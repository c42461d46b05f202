use crate::response::ApiResponse;
use axum::{Json, extract::State, http::StatusCode};
use db::models::{class, department, faculty, student, subject};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct DepartmentStats {
    pub did: String,
    pub name: String,
    pub faculty: u64,
    pub classes: u64,
}

#[derive(Debug, Serialize, Default)]
pub struct StatsResponse {
    pub departments: u64,
    pub faculty: u64,
    pub students: u64,
    pub pending_approvals: u64,
    pub classes: u64,
    pub active_classes: u64,
    pub subjects: u64,
    pub per_department: Vec<DepartmentStats>,
}

/// GET /api/admin/stats
///
/// Entity counts for the admin dashboard, including pending student
/// approvals and per-department faculty/class breakdowns.
pub async fn get_stats(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<StatsResponse>>) {
    match load_stats(app_state.db()).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Stats retrieved successfully")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to load stats");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            )
        }
    }
}

async fn load_stats(db: &DatabaseConnection) -> Result<StatsResponse, DbErr> {
    let departments = department::Entity::find().all(db).await?;

    let mut per_department = Vec::with_capacity(departments.len());
    for dept in &departments {
        per_department.push(DepartmentStats {
            did: dept.did.clone(),
            name: dept.name.clone(),
            faculty: faculty::Entity::find()
                .filter(faculty::Column::Department.eq(&dept.did))
                .count(db)
                .await?,
            classes: class::Entity::find()
                .filter(class::Column::Department.eq(&dept.did))
                .count(db)
                .await?,
        });
    }

    Ok(StatsResponse {
        departments: departments.len() as u64,
        faculty: faculty::Entity::find().count(db).await?,
        students: student::Entity::find().count(db).await?,
        pending_approvals: student::Entity::find()
            .filter(student::Column::IsApproved.eq(false))
            .count(db)
            .await?,
        classes: class::Entity::find().count(db).await?,
        active_classes: class::Entity::find()
            .filter(class::Column::Status.eq("Active"))
            .count(db)
            .await?,
        subjects: subject::Entity::find().count(db).await?,
        per_department,
    })
}
