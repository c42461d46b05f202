//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness check (public)
//! - `/auth` → login and student self-registration (public)
//! - `/admin` → the full administration surface (admin-only, guarded)

use crate::auth::guards::allow_admin;
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod admin;
pub mod auth;
pub mod health;

/// Builds the complete application router for all HTTP endpoints.
///
/// The admin group carries the `allow_admin` guard as a route layer so every
/// nested handler, including the live event stream, sees a verified admin
/// principal in the request extensions.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/auth", auth::auth_routes())
        .nest(
            "/admin",
            admin::admin_routes().route_layer(from_fn(allow_admin)),
        )
        .with_state(app_state)
}
