//! Routes for the `/api/admin/classes` endpoint group.

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod patch;
pub mod post;
pub mod put;

/// Builds the `/classes` route group.
///
/// - `GET /classes` → `list_classes`
/// - `POST /classes` → `create_class`
/// - `PUT /classes/{id}` → `update_class`
/// - `PATCH /classes/{id}/end` → `end_class`
/// - `PATCH /classes/{id}/assign-faculty` → `assign_faculty`
/// - `DELETE /classes/{id}` → `delete_class`
pub fn class_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_classes))
        .route("/", post(post::create_class))
        .route("/{id}", put(put::update_class))
        .route("/{id}/end", patch(patch::end_class))
        .route("/{id}/assign-faculty", patch(patch::assign_faculty))
        .route("/{id}", delete(delete::delete_class))
}
