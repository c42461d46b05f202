//! Routes for the `/api/admin/departments` endpoint group.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/departments` route group.
///
/// - `GET /departments` → `list_departments`
/// - `POST /departments` → `create_department`
/// - `PUT /departments/{id}` → `update_department`
/// - `DELETE /departments/{id}` → `delete_department`
pub fn department_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_departments))
        .route("/", post(post::create_department))
        .route("/{id}", put(put::update_department))
        .route("/{id}", delete(delete::delete_department))
}
