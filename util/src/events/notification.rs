//! Typed notification events broadcast to connected admin clients.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Discriminant of a [`Notification`]; fully determines the payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    ConnectionEstablished,
    BulkImportProgress,
    BulkImportCompleted,
    ClassEnded,
    NewStudentPendingApproval,
}

/// A single event pushed to admin clients over the live stream.
///
/// Serializes to the flat wire shape consumed by `EventSource` clients:
/// `{"type": "...", "target": "...", <payload keys>, "timestamp": <unix ms>}`.
/// Notifications are never persisted and never replayed to late subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Resource discriminator for events that concern one collection
    /// (e.g. "students" vs "faculty" bulk imports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    /// Milliseconds since the Unix epoch, taken at construction.
    pub timestamp: i64,
}

impl Notification {
    fn new(kind: NotificationKind, target: Option<String>, payload: Map<String, Value>) -> Self {
        Self {
            kind,
            target,
            payload,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Initial acknowledgment sent once per streaming connection.
    pub fn connection_established() -> Self {
        let mut payload = Map::new();
        payload.insert(
            "message".into(),
            json!("Live event stream connected."),
        );
        Self::new(NotificationKind::ConnectionEstablished, None, payload)
    }

    /// Periodic progress report from a running bulk import.
    pub fn bulk_import_progress(
        target: impl Into<String>,
        processed: u64,
        total: u64,
        skipped: u64,
    ) -> Self {
        let mut payload = Map::new();
        payload.insert("processed".into(), json!(processed));
        payload.insert("total".into(), json!(total));
        payload.insert("skipped".into(), json!(skipped));
        Self::new(
            NotificationKind::BulkImportProgress,
            Some(target.into()),
            payload,
        )
    }

    /// Final counters once a bulk import batch has been written.
    pub fn bulk_import_completed(
        target: impl Into<String>,
        imported: u64,
        total: u64,
        skipped: u64,
    ) -> Self {
        let mut payload = Map::new();
        payload.insert("imported".into(), json!(imported));
        payload.insert("total".into(), json!(total));
        payload.insert("skipped".into(), json!(skipped));
        Self::new(
            NotificationKind::BulkImportCompleted,
            Some(target.into()),
            payload,
        )
    }

    pub fn class_ended(class_id: impl Into<String>, class_name: impl Into<String>) -> Self {
        let mut payload = Map::new();
        payload.insert("classId".into(), json!(class_id.into()));
        payload.insert("className".into(), json!(class_name.into()));
        Self::new(NotificationKind::ClassEnded, None, payload)
    }

    pub fn new_student_pending_approval(
        student_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let mut payload = Map::new();
        payload.insert("studentId".into(), json!(student_id.into()));
        payload.insert("name".into(), json!(name.into()));
        Self::new(NotificationKind::NewStudentPendingApproval, None, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_serializes_to_flat_wire_shape() {
        let n = Notification::bulk_import_progress("students", 25, 100, 3);
        let v = serde_json::to_value(&n).unwrap();

        assert_eq!(v["type"], "BULK_IMPORT_PROGRESS");
        assert_eq!(v["target"], "students");
        assert_eq!(v["processed"], 25);
        assert_eq!(v["total"], 100);
        assert_eq!(v["skipped"], 3);
        assert!(v["timestamp"].is_i64());
    }

    #[test]
    fn target_is_omitted_when_absent() {
        let n = Notification::connection_established();
        let v = serde_json::to_value(&n).unwrap();

        assert_eq!(v["type"], "CONNECTION_ESTABLISHED");
        assert_eq!(v["message"], "Live event stream connected.");
        assert!(v.get("target").is_none());
    }

    #[test]
    fn domain_events_carry_resource_identifiers() {
        let v = serde_json::to_value(Notification::class_ended("42", "Algorithms - CSE")).unwrap();
        assert_eq!(v["type"], "CLASS_ENDED");
        assert_eq!(v["classId"], "42");
        assert_eq!(v["className"], "Algorithms - CSE");

        let v =
            serde_json::to_value(Notification::new_student_pending_approval("SID-9", "Asha")).unwrap();
        assert_eq!(v["type"], "NEW_STUDENT_PENDING_APPROVAL");
        assert_eq!(v["studentId"], "SID-9");
    }
}
