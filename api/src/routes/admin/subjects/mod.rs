//! Routes for the `/api/admin/subjects` endpoint group.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/subjects` route group.
///
/// - `GET /subjects` → `list_subjects`
/// - `POST /subjects` → `create_subject`
/// - `PUT /subjects/{id}` → `update_subject`
/// - `DELETE /subjects/{id}` → `delete_subject`
pub fn subject_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_subjects))
        .route("/", post(post::create_subject))
        .route("/{id}", put(put::update_subject))
        .route("/{id}", delete(delete::delete_subject))
}
