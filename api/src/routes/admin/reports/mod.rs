//! Routes for the `/api/admin/reports` endpoint group.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

/// Builds the `/reports` route group.
///
/// - `GET /reports/class/{id}` → `class_report`
pub fn report_routes() -> Router<AppState> {
    Router::new().route("/class/{id}", get(get::class_report))
}
