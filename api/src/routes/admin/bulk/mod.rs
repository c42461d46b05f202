//! Routes for the `/api/admin/bulk` endpoint group.

use axum::{Router, routing::post};
use util::state::AppState;

pub mod post;

/// Builds the `/bulk` route group.
///
/// - `POST /bulk/students` → `bulk_import_students`
/// - `POST /bulk/faculty` → `bulk_import_faculty`
pub fn bulk_routes() -> Router<AppState> {
    Router::new()
        .route("/students", post(post::bulk_import_students))
        .route("/faculty", post(post::bulk_import_faculty))
}
