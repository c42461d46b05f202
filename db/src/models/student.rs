use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Represents a student in the `students` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique natural identifier, e.g. "SID-001".
    pub student_id: String,
    /// Display name. Nullable: self-registered students supply only their
    /// identifier and password until an admin fills in the rest.
    pub name: Option<String>,
    /// Securely hashed password string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Self-registered students start unapproved and cannot log in.
    pub is_approved: bool,
    /// Department code (DID), e.g. "CSE".
    pub department: Option<String>,
    /// Semester number (1-8).
    pub semester: Option<i32>,
    /// Admission academic year string, e.g. "2023" or "2023-24".
    pub admission_year: Option<String>,
    /// Roll number within the batch (not necessarily globally unique).
    pub roll_number: Option<String>,
    /// Derived academic year (1..N) at creation time based on admission_year.
    pub current_year: Option<i32>,
    /// Class the student is enrolled in, if any.
    pub class_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}
