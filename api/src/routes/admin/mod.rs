//! Routes for the `/api/admin` endpoint group. Every route here sits behind
//! the `allow_admin` guard applied in [`crate::routes::routes`].

use axum::{Router, routing::get};
use util::state::AppState;

pub mod audit_logs;
pub mod bulk;
pub mod classes;
pub mod departments;
pub mod events;
pub mod export;
pub mod faculty;
pub mod reports;
pub mod stats;
pub mod students;
pub mod subjects;

/// Builds the `/admin` route group.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::event_stream))
        .route("/stats", get(stats::get_stats))
        .route("/audit-logs", get(audit_logs::list_audit_logs))
        .route("/export/students", get(export::export_students))
        .route("/export/faculty", get(export::export_faculty))
        .route("/template/students", get(export::student_template))
        .route("/template/faculty", get(export::faculty_template))
        .nest("/departments", departments::department_routes())
        .nest("/faculty", faculty::faculty_routes())
        .nest("/students", students::student_routes())
        .nest("/classes", classes::class_routes())
        .nest("/subjects", subjects::subject_routes())
        .nest("/reports", reports::report_routes())
        .nest("/bulk", bulk::bulk_routes())
}
