use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Represents a class offering in the `classes` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Generated slug identifier, unique per semester
    /// (e.g. "CSE-ALGORITHMS-S3").
    pub class_id: String,
    /// Display name including the department suffix
    /// (e.g. "Algorithms - Computer Science").
    pub class_name: String,
    /// Department code (DID), stored uppercased.
    pub department: String,
    /// Academic term year string, e.g. "2024-25".
    pub term_year: String,
    /// Semester number (1-8); parity must match `odd_even`.
    pub semester: i32,
    /// "Odd" or "Even".
    pub odd_even: String,
    /// "Active" or "Ended".
    pub status: String,
    /// Set once when the class is ended.
    pub ended_at: Option<DateTime<Utc>>,
    /// Assigned faculty member, if any.
    pub faculty_id: Option<i64>,
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
