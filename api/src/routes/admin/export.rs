//! Spreadsheet exports and blank import templates for the admin UI.

use crate::response::ApiResponse;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use db::models::{department, faculty, student};
use rust_xlsxwriter::{Workbook, XlsxError};
use sea_orm::EntityTrait;
use serde_json::Value;
use std::collections::HashMap;
use util::state::AppState;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const STUDENT_HEADER: [&str; 6] = [
    "Student ID",
    "Name",
    "Department",
    "Admission Year",
    "Roll Number",
    "Password",
];

const FACULTY_HEADER: [&str; 4] = ["Faculty ID", "Name", "Department ID", "Password"];

fn xlsx_attachment(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn export_failed(context: &str, e: impl std::fmt::Display) -> Response {
    tracing::error!(error = %e, "{context}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<Value>::error("Failed to build spreadsheet")),
    )
        .into_response()
}

fn write_header(workbook: &mut Workbook, header: &[&str]) -> Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet();
    for (col, text) in header.iter().enumerate() {
        worksheet.write(0, col as u16, *text)?;
    }
    Ok(())
}

/// GET /api/admin/export/students
///
/// All students as an xlsx attachment, with the department column expanded to
/// the display name. The password column is left blank: hashes never leave
/// the database.
pub async fn export_students(State(app_state): State<AppState>) -> Response {
    let db = app_state.db();

    let (students, departments) =
        match (student::Entity::find().all(db).await, department::Entity::find().all(db).await) {
            (Ok(s), Ok(d)) => (s, d),
            (Err(e), _) | (_, Err(e)) => return export_failed("student export query failed", e),
        };

    let names: HashMap<String, String> = departments
        .into_iter()
        .map(|d| (d.did, d.name))
        .collect();

    let bytes = (|| -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        write_header(&mut workbook, &STUDENT_HEADER)?;
        let worksheet = workbook.worksheet_from_index(0)?;
        for (row, s) in students.iter().enumerate() {
            let row = (row + 1) as u32;
            worksheet.write(row, 0, s.student_id.as_str())?;
            worksheet.write(row, 1, s.name.as_deref().unwrap_or(""))?;
            let dept = s
                .department
                .as_ref()
                .map(|did| names.get(did).cloned().unwrap_or_else(|| did.clone()))
                .unwrap_or_default();
            worksheet.write(row, 2, dept)?;
            worksheet.write(row, 3, s.admission_year.as_deref().unwrap_or(""))?;
            worksheet.write(row, 4, s.roll_number.as_deref().unwrap_or(""))?;
        }
        workbook.save_to_buffer()
    })();

    match bytes {
        Ok(bytes) => xlsx_attachment("students.xlsx", bytes),
        Err(e) => export_failed("student export workbook failed", e),
    }
}

/// GET /api/admin/export/faculty
pub async fn export_faculty(State(app_state): State<AppState>) -> Response {
    let db = app_state.db();

    let faculty = match faculty::Entity::find().all(db).await {
        Ok(f) => f,
        Err(e) => return export_failed("faculty export query failed", e),
    };

    let bytes = (|| -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        write_header(&mut workbook, &FACULTY_HEADER)?;
        let worksheet = workbook.worksheet_from_index(0)?;
        for (row, f) in faculty.iter().enumerate() {
            let row = (row + 1) as u32;
            worksheet.write(row, 0, f.faculty_id.as_str())?;
            worksheet.write(row, 1, f.name.as_str())?;
            worksheet.write(row, 2, f.department.as_str())?;
        }
        workbook.save_to_buffer()
    })();

    match bytes {
        Ok(bytes) => xlsx_attachment("faculty.xlsx", bytes),
        Err(e) => export_failed("faculty export workbook failed", e),
    }
}

fn template(header: &[&str], sample: &[&str], filename: &str) -> Response {
    let bytes = (|| -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        write_header(&mut workbook, header)?;
        let worksheet = workbook.worksheet_from_index(0)?;
        for (col, text) in sample.iter().enumerate() {
            worksheet.write(1, col as u16, *text)?;
        }
        workbook.save_to_buffer()
    })();

    match bytes {
        Ok(bytes) => xlsx_attachment(filename, bytes),
        Err(e) => export_failed("template workbook failed", e),
    }
}

/// GET /api/admin/template/students
///
/// One-row sample file matching the bulk import column layout.
pub async fn student_template() -> Response {
    template(
        &STUDENT_HEADER,
        &["S-001", "Asha Verma", "CSE", "2023", "1", "ChangeMe123"],
        "students-template.xlsx",
    )
}

/// GET /api/admin/template/faculty
pub async fn faculty_template() -> Response {
    template(
        &FACULTY_HEADER,
        &["F-001", "Dr. Iyer", "CSE", "ChangeMe123"],
        "faculty-template.xlsx",
    )
}
