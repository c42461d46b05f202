//! Class identifier generation shared by the create and update handlers.

use db::models::class;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

/// Collapses a label into a slug segment: uppercased, with every run of
/// non-alphanumeric characters replaced by one dash.
fn slug_segment(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_dash = false;
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_uppercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Builds the base class identifier, e.g. `CSE-ALGORITHMS-S3`.
pub fn class_slug(department: &str, name: &str, semester: i32) -> String {
    format!(
        "{}-{}-S{}",
        slug_segment(department),
        slug_segment(name),
        semester
    )
}

/// Returns `base`, or `base-2`, `base-3`, ... — the first identifier not
/// already taken by another class in the same semester.
pub async fn unique_class_id(
    db: &DatabaseConnection,
    base: &str,
    semester: i32,
    exclude_id: Option<i64>,
) -> Result<String, DbErr> {
    let mut candidate = base.to_string();
    let mut suffix = 2;
    loop {
        let mut query = class::Entity::find()
            .filter(class::Column::ClassId.eq(&candidate))
            .filter(class::Column::Semester.eq(semester));
        if let Some(id) = exclude_id {
            query = query.filter(class::Column::Id.ne(id));
        }
        if query.one(db).await?.is_none() {
            return Ok(candidate);
        }
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
}

/// Matches a semester number against the "Odd"/"Even" term label.
pub fn parity_matches(semester: i32, odd_even: &str) -> bool {
    match odd_even {
        "Odd" => semester % 2 == 1,
        "Even" => semester % 2 == 0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_uppercases_and_collapses_separators() {
        assert_eq!(class_slug("CSE", "Algorithms", 3), "CSE-ALGORITHMS-S3");
        assert_eq!(
            class_slug("cse", "data   structures & algo", 1),
            "CSE-DATA-STRUCTURES-ALGO-S1"
        );
        assert_eq!(class_slug("EE", "  circuits!  ", 2), "EE-CIRCUITS-S2");
    }

    #[test]
    fn parity_check_matches_term_label() {
        assert!(parity_matches(1, "Odd"));
        assert!(parity_matches(4, "Even"));
        assert!(!parity_matches(2, "Odd"));
        assert!(!parity_matches(3, "Even"));
        assert!(!parity_matches(3, "odd"));
    }
}
