use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::{class, student};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct ClassReportResponse {
    pub class: Option<class::Model>,
    pub students: Vec<student::Model>,
    pub student_count: u64,
}

/// GET /api/admin/reports/class/{id}
///
/// Class details together with the enrolled-student roster and headcount.
pub async fn class_report(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<ClassReportResponse>>) {
    let db = app_state.db();

    let target = match class::Entity::find_by_id(id).one(db).await {
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

    let students = match student::Entity::find()
        .filter(student::Column::ClassId.eq(target.id))
        .order_by_asc(student::Column::StudentId)
        .all(db)
        .await
    {
        Ok(students) => students,
        Err(e) => {
            tracing::error!(error = %e, "class roster lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    };

    let student_count = students.len() as u64;
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            ClassReportResponse {
                class: Some(target),
                students,
                student_count,
            },
            "Class report retrieved successfully",
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;
    use sea_orm::{ActiveModelTrait, Set};
    use util::events::EventBus;

    async fn seed_class(app_state: &AppState) -> class::Model {
        class::ActiveModel {
            class_id: Set("CSE-ALGORITHMS-S3".into()),
            class_name: Set("Algorithms - Computer Science".into()),
            department: Set("CSE".into()),
            term_year: Set("2024-25".into()),
            semester: Set(3),
            odd_even: Set("Odd".into()),
            status: Set("Active".into()),
            ..Default::default()
        }
        .insert(app_state.db())
        .await
        .unwrap()
    }

    async fn seed_student(app_state: &AppState, student_id: &str, class_id: Option<i64>) {
        student::ActiveModel {
            student_id: Set(student_id.into()),
            name: Set(Some(student_id.into())),
            password_hash: Set("hash".into()),
            is_approved: Set(true),
            class_id: Set(class_id),
            ..Default::default()
        }
        .insert(app_state.db())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn report_lists_only_students_enrolled_in_the_class() {
        let app_state = AppState::new(setup_test_db().await, EventBus::new());
        let target = seed_class(&app_state).await;
        seed_student(&app_state, "S-1", Some(target.id)).await;
        seed_student(&app_state, "S-2", Some(target.id)).await;
        seed_student(&app_state, "S-3", None).await;

        let (status, body) = class_report(State(app_state), Path(target.id)).await;
        assert_eq!(status, StatusCode::OK);
        let report = body.0.data;
        assert_eq!(report.student_count, 2);
        assert_eq!(report.students.len(), 2);
        assert_eq!(report.class.unwrap().class_id, "CSE-ALGORITHMS-S3");
    }

    #[tokio::test]
    async fn unknown_class_is_a_404() {
        let app_state = AppState::new(setup_test_db().await, EventBus::new());

        let (status, body) = class_report(State(app_state), Path(999)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.0.message, "Class not found");
    }
}
