//! Bulk spreadsheet import pipeline for students and faculty.
//!
//! Converts an uploaded `.xlsx` file into idempotent upserts keyed on the
//! natural identifier, tolerating row-level errors: a row missing a required
//! field is counted as skipped and never aborts the batch. Progress is pushed
//! live to admin clients through the notification bus, and one completion
//! event plus one audit entry summarize the run.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::{Datelike, Utc};
use db::audit::{self, AuditAction};
use db::models::{department, faculty, student};
use db::password::hash_password;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set, TransactionTrait};
use serde::Serialize;
use thiserror::Error;
use util::config;
use util::events::{EventBus, Notification};

#[derive(Debug, Error)]
pub enum ImportError {
    /// The file could not be parsed as a spreadsheet at all.
    #[error("failed to read spreadsheet: {0}")]
    Workbook(String),
    /// Every data row was invalid, or the file had no data rows.
    #[error("no valid rows found in uploaded file")]
    NoValidRows,
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Final counters for one import run. `imported + skipped == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: u64,
    pub skipped: u64,
    pub total: u64,
}

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})").expect("valid regex"));

/// Derives the student's current academic year (1..N) from the first 4-digit
/// year found in the admission-year string, relative to the wall-clock year.
/// Returns `None` when no plausible year is present; derivation failure is
/// silent by design of the import pipeline.
pub fn derive_current_year(admission_year: &str) -> Option<i32> {
    let captures = YEAR_RE.captures(admission_year)?;
    let start: i32 = captures.get(1)?.as_str().parse().ok()?;
    if !(1900..=2100).contains(&start) {
        return None;
    }
    let now = Utc::now().year();
    Some((now - start + 1).max(1))
}

/// Reads the first worksheet into rows of trimmed cell strings, skipping the
/// header row. Empty cells become `None`.
fn extract_rows(bytes: &[u8]) -> Result<Vec<Vec<Option<String>>>, ImportError> {
    let mut workbook =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| ImportError::Workbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::Workbook("workbook has no worksheets".into()))?
        .map_err(|e| ImportError::Workbook(e.to_string()))?;

    Ok(range
        .rows()
        .skip(1)
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        // Numeric identifiers come back as floats; render 2023.0 as "2023".
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn field(row: &[Option<String>], index: usize) -> Option<String> {
    row.get(index).cloned().flatten()
}

/// Builds the department lookup used to resolve the students' department
/// column, which may hold either a display name or a DID. Name matches are
/// case-insensitive; code matches are exact.
async fn department_lookup(db: &DatabaseConnection) -> Result<HashMap<String, String>, DbErr> {
    let mut lookup = HashMap::new();
    for dept in department::Entity::find().all(db).await? {
        lookup.insert(dept.name.to_lowercase(), dept.did.clone());
        lookup.insert(dept.did.clone(), dept.did);
    }
    Ok(lookup)
}

fn resolve_department(lookup: &HashMap<String, String>, value: &str) -> Option<String> {
    lookup
        .get(&value.to_lowercase())
        .or_else(|| lookup.get(value))
        .cloned()
}

/// Imports students from an uploaded workbook.
///
/// Columns: `[Student ID, Name, Department, Admission Year, Roll Number,
/// Password]`; required: id, name, password. Re-running the same file is safe:
/// upserts are keyed on `student_id`, and optional cells left blank on a
/// re-import keep whatever the existing record already holds.
pub async fn import_students(
    db: &DatabaseConnection,
    events: &EventBus,
    actor_id: i64,
    bytes: &[u8],
) -> Result<ImportReport, ImportError> {
    let rows = extract_rows(bytes)?;
    let departments = department_lookup(db).await?;
    let progress_every = config::bulk_import_progress_every();

    let total = rows.len() as u64;
    let mut processed: u64 = 0;
    let mut skipped: u64 = 0;
    let mut ops: Vec<(student::ActiveModel, Vec<student::Column>)> = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let student_id = field(row, 0);
        let name = field(row, 1);
        let password = field(row, 5);

        match (student_id, name, password) {
            (Some(student_id), Some(name), Some(password)) => match hash_password(&password) {
                Ok(hash) => {
                    let department = field(row, 2)
                        .and_then(|value| resolve_department(&departments, &value));
                    let admission_year = field(row, 3);
                    let current_year = admission_year
                        .as_deref()
                        .and_then(derive_current_year);
                    // Roll number falls back to the student id when absent.
                    let roll_number = field(row, 4).unwrap_or_else(|| student_id.clone());

                    // On conflict, blank or unresolvable optional cells must
                    // not null out values a previous import stored.
                    let mut update_cols = vec![
                        student::Column::Name,
                        student::Column::PasswordHash,
                        student::Column::IsApproved,
                        student::Column::RollNumber,
                    ];
                    if department.is_some() {
                        update_cols.push(student::Column::Department);
                    }
                    if admission_year.is_some() {
                        update_cols.push(student::Column::AdmissionYear);
                    }
                    if current_year.is_some() {
                        update_cols.push(student::Column::CurrentYear);
                    }

                    let op = student::ActiveModel {
                        student_id: Set(student_id),
                        name: Set(Some(name)),
                        password_hash: Set(hash),
                        is_approved: Set(true),
                        department: Set(department),
                        admission_year: Set(admission_year),
                        roll_number: Set(Some(roll_number)),
                        current_year: Set(current_year),
                        ..Default::default()
                    };
                    ops.push((op, update_cols));
                    processed += 1;
                }
                Err(e) => {
                    tracing::warn!(row = index + 2, error = %e, "password hashing failed; row skipped");
                    skipped += 1;
                }
            },
            _ => skipped += 1,
        }

        let seen = (index + 1) as u64;
        if seen % progress_every == 0 || seen == total {
            events.publish(Notification::bulk_import_progress(
                "students", processed, total, skipped,
            ));
        }
    }

    if ops.is_empty() {
        return Err(ImportError::NoValidRows);
    }

    let txn = db.begin().await?;
    for (op, update_cols) in ops {
        student::Entity::insert(op)
            .on_conflict(
                OnConflict::column(student::Column::StudentId)
                    .update_columns(update_cols)
                    .to_owned(),
            )
            .exec(&txn)
            .await?;
    }
    txn.commit().await?;

    let report = ImportReport {
        imported: processed,
        skipped,
        total,
    };
    audit::record(
        db,
        actor_id,
        AuditAction::BulkImportStudents,
        serde_json::json!({ "imported": report.imported, "skipped": report.skipped, "total": report.total }),
    )
    .await;
    events.publish(Notification::bulk_import_completed(
        "students",
        report.imported,
        report.total,
        report.skipped,
    ));

    Ok(report)
}

/// Imports faculty from an uploaded workbook.
///
/// Columns: `[Faculty ID, Name, Department ID, Password]`; all required.
/// Upserts are keyed on `faculty_id`.
pub async fn import_faculty(
    db: &DatabaseConnection,
    events: &EventBus,
    actor_id: i64,
    bytes: &[u8],
) -> Result<ImportReport, ImportError> {
    let rows = extract_rows(bytes)?;
    let progress_every = config::bulk_import_progress_every();

    let total = rows.len() as u64;
    let mut processed: u64 = 0;
    let mut skipped: u64 = 0;
    let mut ops: Vec<faculty::ActiveModel> = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let faculty_id = field(row, 0);
        let name = field(row, 1);
        let department = field(row, 2);
        let password = field(row, 3);

        match (faculty_id, name, department, password) {
            (Some(faculty_id), Some(name), Some(department), Some(password)) => {
                match hash_password(&password) {
                    Ok(hash) => {
                        ops.push(faculty::ActiveModel {
                            faculty_id: Set(faculty_id),
                            name: Set(name),
                            department: Set(department.to_uppercase()),
                            password_hash: Set(hash),
                            ..Default::default()
                        });
                        processed += 1;
                    }
                    Err(e) => {
                        tracing::warn!(row = index + 2, error = %e, "password hashing failed; row skipped");
                        skipped += 1;
                    }
                }
            }
            _ => skipped += 1,
        }

        let seen = (index + 1) as u64;
        if seen % progress_every == 0 || seen == total {
            events.publish(Notification::bulk_import_progress(
                "faculty", processed, total, skipped,
            ));
        }
    }

    if ops.is_empty() {
        return Err(ImportError::NoValidRows);
    }

    let txn = db.begin().await?;
    for op in ops {
        faculty::Entity::insert(op)
            .on_conflict(
                OnConflict::column(faculty::Column::FacultyId)
                    .update_columns([
                        faculty::Column::Name,
                        faculty::Column::Department,
                        faculty::Column::PasswordHash,
                    ])
                    .to_owned(),
            )
            .exec(&txn)
            .await?;
    }
    txn.commit().await?;

    let report = ImportReport {
        imported: processed,
        skipped,
        total,
    };
    audit::record(
        db,
        actor_id,
        AuditAction::BulkImportFaculty,
        serde_json::json!({ "imported": report.imported, "skipped": report.skipped, "total": report.total }),
    )
    .await;
    events.publish(Notification::bulk_import_completed(
        "faculty",
        report.imported,
        report.total,
        report.skipped,
    ));

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::audit_log;
    use db::password::verify_password;
    use db::test_utils::setup_test_db;
    use rust_xlsxwriter::Workbook;
    use sea_orm::{ActiveModelTrait, ColumnTrait, PaginatorTrait, QueryFilter};

    fn workbook_bytes(header: &[&str], rows: &[Vec<&str>]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, text) in header.iter().enumerate() {
            worksheet.write(0, col as u16, *text).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                if !text.is_empty() {
                    worksheet.write((r + 1) as u32, c as u16, *text).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    fn student_sheet(rows: &[Vec<&str>]) -> Vec<u8> {
        workbook_bytes(
            &["Student ID", "Name", "Department", "Admission Year", "Roll Number", "Password"],
            rows,
        )
    }

    async fn seed_department(db: &DatabaseConnection, did: &str, name: &str) {
        department::ActiveModel {
            did: Set(did.into()),
            name: Set(name.into()),
            hod: Set("Dr. Rao".into()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn rerunning_the_same_file_is_idempotent() {
        let db = setup_test_db().await;
        let events = EventBus::new();
        let sheet = student_sheet(&[
            vec!["S-1", "Asha", "", "2023", "7", "pw-one"],
            vec!["S-2", "Ravi", "", "2022", "", "pw-two"],
        ]);

        let first = import_students(&db, &events, 1, &sheet).await.unwrap();
        let second = import_students(&db, &events, 1, &sheet).await.unwrap();
        assert_eq!(first, second);

        let all = student::Entity::find().all(&db).await.unwrap();
        assert_eq!(all.len(), 2);
        let asha = all.iter().find(|s| s.student_id == "S-1").unwrap();
        assert_eq!(asha.name.as_deref(), Some("Asha"));
        assert_eq!(asha.roll_number.as_deref(), Some("7"));
        assert!(verify_password("pw-one", &asha.password_hash));
    }

    #[tokio::test]
    async fn rows_missing_required_fields_are_skipped_not_fatal() {
        let db = setup_test_db().await;
        let events = EventBus::new();
        let sheet = student_sheet(&[
            vec!["S-1", "Asha", "", "", "", "pw"],
            vec!["", "No Id", "", "", "", "pw"],
            vec!["S-3", "", "", "", "", "pw"],
            vec!["S-4", "No Password", "", "", "", ""],
            vec!["S-5", "Meera", "", "", "", "pw"],
        ]);

        let report = import_students(&db, &events, 1, &sheet).await.unwrap();
        assert_eq!(report, ImportReport { imported: 2, skipped: 3, total: 5 });
        assert_eq!(student::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn reimport_with_blank_cells_preserves_existing_fields() {
        let db = setup_test_db().await;
        seed_department(&db, "CSE", "Computer Science").await;
        let events = EventBus::new();

        let full = student_sheet(&[vec!["S-1", "Asha", "CSE", "2023", "7", "pw"]]);
        import_students(&db, &events, 1, &full).await.unwrap();

        // Same student, department and admission-year cells left empty.
        let sparse = student_sheet(&[vec!["S-1", "Asha", "", "", "7", "pw"]]);
        import_students(&db, &events, 1, &sparse).await.unwrap();

        let asha = student::Entity::find()
            .filter(student::Column::StudentId.eq("S-1"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asha.department.as_deref(), Some("CSE"));
        assert_eq!(asha.admission_year.as_deref(), Some("2023"));
        assert!(asha.current_year.is_some());

        // An unresolvable department cell is treated like a blank one.
        let bogus = student_sheet(&[vec!["S-1", "Asha", "Basket Weaving", "", "7", "pw"]]);
        import_students(&db, &events, 1, &bogus).await.unwrap();
        let asha = student::Entity::find()
            .filter(student::Column::StudentId.eq("S-1"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asha.department.as_deref(), Some("CSE"));
    }

    #[tokio::test]
    async fn department_resolves_by_name_or_code_with_silent_fallback() {
        let db = setup_test_db().await;
        seed_department(&db, "CSE", "Computer Science").await;
        let events = EventBus::new();
        let sheet = student_sheet(&[
            vec!["S-1", "Asha", "computer science", "", "", "pw"],
            vec!["S-2", "Ravi", "CSE", "", "", "pw"],
            vec!["S-3", "Meera", "Basket Weaving", "", "", "pw"],
        ]);

        import_students(&db, &events, 1, &sheet).await.unwrap();

        let all = student::Entity::find().all(&db).await.unwrap();
        let by_id = |id: &str| all.iter().find(|s| s.student_id == id).unwrap();
        assert_eq!(by_id("S-1").department.as_deref(), Some("CSE"));
        assert_eq!(by_id("S-2").department.as_deref(), Some("CSE"));
        // Unresolvable lookup leaves the association unset, row still imported.
        assert_eq!(by_id("S-3").department, None);
    }

    #[tokio::test]
    async fn header_only_file_is_rejected_with_no_writes() {
        let db = setup_test_db().await;
        let events = EventBus::new();
        let sheet = student_sheet(&[]);

        let err = import_students(&db, &events, 1, &sheet).await.unwrap_err();
        assert!(matches!(err, ImportError::NoValidRows));
        assert_eq!(student::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(audit_log::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn garbage_bytes_are_a_workbook_error() {
        let db = setup_test_db().await;
        let events = EventBus::new();

        let err = import_students(&db, &events, 1, b"not a zip archive")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Workbook(_)));
    }

    #[tokio::test]
    async fn progress_events_are_monotonic_and_account_for_every_row() {
        let db = setup_test_db().await;
        let events = EventBus::new();
        let (_sub, mut rx) = events.subscribe();

        // 30 rows with one invalid: progress fires at row 25 and at the end.
        let mut rows: Vec<Vec<&str>> = (0..29)
            .map(|_| vec!["S", "Name", "", "", "", "pw"])
            .collect();
        rows.insert(10, vec!["", "missing id", "", "", "", "pw"]);
        // Distinct ids so every valid row upserts its own record.
        let ids: Vec<String> = (0..30).map(|i| format!("S-{i}")).collect();
        for (i, row) in rows.iter_mut().enumerate() {
            if !row[0].is_empty() {
                row[0] = &ids[i];
            }
        }
        let sheet = student_sheet(&rows);

        let report = import_students(&db, &events, 1, &sheet).await.unwrap();
        assert_eq!(report.total, 30);
        assert_eq!(report.skipped, 1);

        let mut progress = Vec::new();
        while let Ok(n) = rx.try_recv() {
            let v = serde_json::to_value(&n).unwrap();
            if v["type"] == "BULK_IMPORT_PROGRESS" {
                progress.push((v["processed"].as_u64().unwrap(), v["skipped"].as_u64().unwrap()));
            } else {
                assert_eq!(v["type"], "BULK_IMPORT_COMPLETED");
                assert_eq!(v["imported"], 29);
                assert_eq!(v["total"], 30);
            }
        }
        assert!(progress.len() >= 2);
        assert!(progress.windows(2).all(|w| w[0].0 <= w[1].0));
        let (last_processed, last_skipped) = *progress.last().unwrap();
        assert_eq!(last_processed + last_skipped, 30);
    }

    #[tokio::test]
    async fn faculty_rows_require_every_column() {
        let db = setup_test_db().await;
        let events = EventBus::new();
        let sheet = workbook_bytes(
            &["Faculty ID", "Name", "Department ID", "Password"],
            &[
                vec!["F-1", "Dr. Iyer", "cse", "pw"],
                vec!["F-2", "Dr. Khan", "", "pw"],
            ],
        );

        let report = import_faculty(&db, &events, 1, &sheet).await.unwrap();
        assert_eq!(report, ImportReport { imported: 1, skipped: 1, total: 2 });

        let f = faculty::Entity::find()
            .filter(faculty::Column::FacultyId.eq("F-1"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(f.department, "CSE");
    }

    #[tokio::test]
    async fn completed_import_records_one_audit_entry() {
        let db = setup_test_db().await;
        let events = EventBus::new();
        let sheet = student_sheet(&[vec!["S-1", "Asha", "", "", "", "pw"]]);

        import_students(&db, &events, 42, &sheet).await.unwrap();

        let entries = audit_log::Entity::find().all(&db).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "BULK_IMPORT_STUDENTS");
        assert_eq!(entries[0].actor_id, 42);
        assert_eq!(entries[0].details["imported"], 1);
    }

    #[test]
    fn current_year_derivation_clamps_and_fails_silently() {
        let this_year = Utc::now().year();
        assert_eq!(derive_current_year("2023"), Some((this_year - 2023 + 1).max(1)));
        assert_eq!(derive_current_year("2023-24"), Some((this_year - 2023 + 1).max(1)));
        // Future admission years clamp to 1 rather than going non-positive.
        assert_eq!(derive_current_year("2100"), Some(1));
        assert_eq!(derive_current_year("batch of 99"), None);
        assert_eq!(derive_current_year("9999"), None);
        assert_eq!(derive_current_year(""), None);
    }
}
