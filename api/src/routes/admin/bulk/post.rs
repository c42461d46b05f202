use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::services::bulk_import::{self, ImportError, ImportReport};
use axum::{Extension, Json, extract::Multipart, extract::State, http::StatusCode};
use util::state::AppState;

/// Pulls the uploaded spreadsheet bytes out of the `file` multipart field.
async fn read_upload(multipart: &mut Multipart) -> Result<Vec<u8>, String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Malformed multipart body: {e}"))?
    {
        if field.name() == Some("file") {
            return field
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(|e| format!("Failed to read upload: {e}"));
        }
    }
    Err("Missing 'file' field in upload".to_string())
}

fn import_response(
    result: Result<ImportReport, ImportError>,
    noun: &str,
) -> (StatusCode, Json<ApiResponse<Option<ImportReport>>>) {
    match result {
        Ok(report) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                Some(report),
                format!(
                    "Imported {} {noun} ({} skipped)",
                    report.imported, report.skipped
                ),
            )),
        ),
        Err(ImportError::NoValidRows) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!(
                "No valid {noun} data found in file"
            ))),
        ),
        Err(ImportError::Workbook(e)) => {
            tracing::error!(error = %e, "bulk import parse failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Could not read the uploaded spreadsheet")),
            )
        }
        Err(ImportError::Db(e)) => {
            tracing::error!(error = %e, "bulk import database failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error during import")),
            )
        }
    }
}

/// POST /api/admin/bulk/students
///
/// Multipart upload (`file` field, `.xlsx`). Returns `201` with final
/// counters, `400` when the file contains no valid rows, `500` when the
/// workbook cannot be parsed. Progress is streamed to `/admin/events`.
pub async fn bulk_import_students(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    mut multipart: Multipart,
) -> (StatusCode, Json<ApiResponse<Option<ImportReport>>>) {
    let bytes = match read_upload(&mut multipart).await {
        Ok(bytes) => bytes,
        Err(message) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message))),
    };

    let result =
        bulk_import::import_students(app_state.db(), app_state.events(), claims.sub, &bytes).await;
    import_response(result, "student")
}

/// POST /api/admin/bulk/faculty
pub async fn bulk_import_faculty(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    mut multipart: Multipart,
) -> (StatusCode, Json<ApiResponse<Option<ImportReport>>>) {
    let bytes = match read_upload(&mut multipart).await {
        Ok(bytes) => bytes,
        Err(message) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message))),
    };

    let result =
        bulk_import::import_faculty(app_state.db(), app_state.events(), claims.sub, &bytes).await;
    import_response(result, "faculty")
}
