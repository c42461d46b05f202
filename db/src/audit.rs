//! Best-effort audit recorder.
//!
//! Every mutating admin action appends one entry after its primary write
//! commits. Recording failures are logged and swallowed: the audit trail is a
//! side-channel and must never fail or roll back the operation it describes.

use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use strum::Display;

use crate::models::audit_log;

/// Enumerated admin actions as stored in `audit_logs.action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    CreateDepartment,
    UpdateDepartment,
    DeleteDepartment,
    CreateFaculty,
    UpdateFaculty,
    DeleteFaculty,
    CreateStudent,
    UpdateStudent,
    DeleteStudent,
    ApproveStudent,
    EnrollStudent,
    CreateClass,
    UpdateClass,
    DeleteClass,
    EndClass,
    AssignFacultyToClass,
    CreateSubject,
    UpdateSubject,
    DeleteSubject,
    BulkImportStudents,
    BulkImportFaculty,
}

/// Appends one audit entry. Fire-and-forget from the caller's perspective:
/// any storage error is logged and swallowed.
///
/// Call this only after the primary mutation has committed, so the log never
/// claims an action that did not happen.
pub async fn record(
    db: &DatabaseConnection,
    actor_id: i64,
    action: AuditAction,
    details: serde_json::Value,
) {
    let entry = audit_log::ActiveModel {
        actor_id: Set(actor_id),
        action: Set(action.to_string()),
        details: Set(details),
        ..Default::default()
    };

    if let Err(e) = entry.insert(db).await {
        tracing::warn!(error = %e, action = %action, actor_id, "failed to record audit entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};
    use serde_json::json;

    #[tokio::test]
    async fn record_inserts_an_entry() {
        let db = setup_test_db().await;

        record(&db, 1, AuditAction::CreateDepartment, json!({"did": "CSE"})).await;

        let entries = audit_log::Entity::find().all(&db).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "CREATE_DEPARTMENT");
        assert_eq!(entries[0].actor_id, 1);
        assert_eq!(entries[0].details["did"], "CSE");
    }

    #[tokio::test]
    async fn record_swallows_storage_failures() {
        let db = setup_test_db().await;
        // No audit_logs table: the insert fails, but record must not panic
        // or surface the error.
        let broken = setup_test_db().await;
        sea_orm::ConnectionTrait::execute_unprepared(&broken, "DROP TABLE audit_logs")
            .await
            .unwrap();

        record(&broken, 1, AuditAction::DeleteFaculty, json!({})).await;

        // The healthy connection is unaffected.
        record(&db, 2, AuditAction::EndClass, json!({"classId": 9})).await;
        assert_eq!(audit_log::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn action_strings_match_the_wire_format() {
        assert_eq!(AuditAction::BulkImportStudents.to_string(), "BULK_IMPORT_STUDENTS");
        assert_eq!(AuditAction::AssignFacultyToClass.to_string(), "ASSIGN_FACULTY_TO_CLASS");
        assert_eq!(AuditAction::EndClass.to_string(), "END_CLASS");
    }

    #[tokio::test]
    async fn entries_order_newest_first() {
        let db = setup_test_db().await;
        record(&db, 1, AuditAction::CreateClass, json!({"n": 1})).await;
        record(&db, 1, AuditAction::UpdateClass, json!({"n": 2})).await;

        let entries = audit_log::Entity::find()
            .order_by_desc(audit_log::Column::Id)
            .all(&db)
            .await
            .unwrap();
        assert_eq!(entries[0].action, "UPDATE_CLASS");
    }
}
