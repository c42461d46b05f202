use crate::auth::{Role, generate_jwt};
use crate::response::ApiResponse;
use axum::{Json, extract::State, http::StatusCode};
use common::format_validation_errors;
use db::models::{admin, faculty, student};
use db::password::{hash_password, verify_password};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use util::events::Notification;
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Default)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub id: String,
    pub role: String,
}

/// POST /api/auth/login
///
/// Authenticates against the table selected by `role` using the natural
/// identifier. Responds `401` with a uniform "Invalid credentials" for both
/// unknown identifiers and wrong passwords (no account enumeration), and
/// `403` for students still awaiting approval.
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> (StatusCode, Json<ApiResponse<LoginResponse>>) {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&e))),
        );
    }

    let db = app_state.db();
    let lookup: Result<Option<(i64, String, bool)>, DbErr> = match req.role {
        Role::Admin => admin::Entity::find()
            .filter(admin::Column::AdminId.eq(&req.id))
            .one(db)
            .await
            .map(|found| found.map(|m| (m.id, m.password_hash, true))),
        Role::Faculty => faculty::Entity::find()
            .filter(faculty::Column::FacultyId.eq(&req.id))
            .one(db)
            .await
            .map(|found| found.map(|m| (m.id, m.password_hash, true))),
        Role::Student => student::Entity::find()
            .filter(student::Column::StudentId.eq(&req.id))
            .one(db)
            .await
            .map(|found| found.map(|m| (m.id, m.password_hash, m.is_approved))),
    };

    let found = match lookup {
        Ok(found) => found,
        Err(e) => {
            tracing::error!(error = %e, "login lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    };

    let Some((user_id, password_hash, approved)) = found else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        );
    };

    if !verify_password(&req.password, &password_hash) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        );
    }

    if !approved {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Account pending approval")),
        );
    }

    let (token, expires_at) = generate_jwt(user_id, req.role);
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            LoginResponse {
                token,
                expires_at,
                id: req.id,
                role: req.role.as_str().to_string(),
            },
            "Login successful",
        )),
    )
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterStudentRequest {
    #[validate(length(min = 1))]
    pub student_id: String,
    /// Optional; self-registered students may supply only id and password,
    /// an admin fills in the rest on approval.
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 8))]
    pub password: String,
}

/// POST /api/auth/register-student
///
/// Creates an unapproved student account and notifies connected admins via
/// the event stream. The student cannot log in until an admin approves them.
pub async fn register_student(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterStudentRequest>,
) -> (StatusCode, Json<ApiResponse<Value>>) {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&e))),
        );
    }

    let db = app_state.db();
    match student::Entity::find()
        .filter(student::Column::StudentId.eq(&req.student_id))
        .one(db)
        .await
    {
        Ok(Some(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Student ID already registered")),
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "registration lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            );
        }
    }

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "password hashing failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to process registration")),
            );
        }
    };

    let created = student::ActiveModel {
        student_id: Set(req.student_id.clone()),
        name: Set(req.name.clone()),
        password_hash: Set(password_hash),
        is_approved: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(model) => {
            app_state.events().publish(Notification::new_student_pending_approval(
                &model.student_id,
                req.name.as_deref().unwrap_or(&model.student_id),
            ));
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    json!({ "student_id": model.student_id }),
                    "Registration submitted for approval",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "registration insert failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to register student")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;
    use util::events::EventBus;

    async fn test_state() -> AppState {
        AppState::new(setup_test_db().await, EventBus::new())
    }

    #[tokio::test]
    async fn registration_accepts_id_and_password_only() {
        let app_state = test_state().await;
        let (_sub, mut rx) = app_state.events().subscribe();

        let req: RegisterStudentRequest =
            serde_json::from_str(r#"{"student_id":"SID-9","password":"longenough"}"#).unwrap();
        let (status, _) = register_student(State(app_state.clone()), Json(req)).await;
        assert_eq!(status, StatusCode::CREATED);

        let created = student::Entity::find()
            .filter(student::Column::StudentId.eq("SID-9"))
            .one(app_state.db())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.name, None);
        assert!(!created.is_approved);

        // The admin notification falls back to the id when no name was given.
        let v = serde_json::to_value(rx.try_recv().unwrap()).unwrap();
        assert_eq!(v["type"], "NEW_STUDENT_PENDING_APPROVAL");
        assert_eq!(v["name"], "SID-9");
    }

    #[tokio::test]
    async fn registration_still_stores_a_supplied_name() {
        let app_state = test_state().await;

        let req: RegisterStudentRequest = serde_json::from_str(
            r#"{"student_id":"SID-10","name":"Asha","password":"longenough"}"#,
        )
        .unwrap();
        let (status, _) = register_student(State(app_state.clone()), Json(req)).await;
        assert_eq!(status, StatusCode::CREATED);

        let created = student::Entity::find()
            .filter(student::Column::StudentId.eq("SID-10"))
            .one(app_state.db())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.name.as_deref(), Some("Asha"));
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let app_state = test_state().await;

        let first: RegisterStudentRequest =
            serde_json::from_str(r#"{"student_id":"SID-9","password":"longenough"}"#).unwrap();
        register_student(State(app_state.clone()), Json(first)).await;

        let second: RegisterStudentRequest =
            serde_json::from_str(r#"{"student_id":"SID-9","password":"otherenough"}"#).unwrap();
        let (status, body) = register_student(State(app_state), Json(second)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0.message, "Student ID already registered");
    }
}
