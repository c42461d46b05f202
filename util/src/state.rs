//! Application state container shared across Axum route handlers and services.
//!
//! This struct holds shared resources such as the database connection and the
//! notification bus. It is cloned into route handlers via Axum's `State<T>`
//! extractor.

use crate::events::EventBus;
use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The process-wide [`EventBus`] for publishing and subscribing to admin
///   notifications.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    events: EventBus,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and bus.
    pub fn new(db: DatabaseConnection, events: EventBus) -> Self {
        Self { db, events }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a shared reference to the notification bus.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawned tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    /// Returns a cloned handle to the notification bus.
    pub fn events_clone(&self) -> EventBus {
        self.events.clone()
    }
}
