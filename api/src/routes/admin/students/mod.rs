//! Routes for the `/api/admin/students` endpoint group.

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod patch;
pub mod post;
pub mod put;

/// Builds the `/students` route group.
///
/// - `GET /students` → `list_students`
/// - `POST /students` → `create_student`
/// - `PATCH /students/{id}/approve` → `approve_student`
/// - `POST /students/{id}/enroll` → `enroll_student`
/// - `PUT /students/{id}` → `update_student`
/// - `DELETE /students/{id}` → `delete_student`
pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_students))
        .route("/", post(post::create_student))
        .route("/{id}/approve", patch(patch::approve_student))
        .route("/{id}/enroll", post(post::enroll_student))
        .route("/{id}", put(put::update_student))
        .route("/{id}", delete(delete::delete_student))
}
