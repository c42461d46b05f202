//! Routes for the `/api/admin/faculty` endpoint group.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/faculty` route group.
///
/// - `GET /faculty` → `list_faculty`
/// - `POST /faculty` → `create_faculty`
/// - `PUT /faculty/{id}` → `update_faculty`
/// - `DELETE /faculty/{id}` → `delete_faculty`
pub fn faculty_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_faculty))
        .route("/", post(post::create_faculty))
        .route("/{id}", put(put::update_faculty))
        .route("/{id}", delete(delete::delete_faculty))
}
