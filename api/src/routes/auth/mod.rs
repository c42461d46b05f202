//! Routes for the `/api/auth` endpoint group.

use axum::{Router, routing::post};
use util::state::AppState;

pub mod post;

use post::{login, register_student};

/// Builds the `/auth` route group.
///
/// - `POST /auth/login` → `login`
/// - `POST /auth/register-student` → `register_student`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register-student", post(register_student))
}
