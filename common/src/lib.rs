use serde::Deserialize;
use validator::ValidationErrors;

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Common `?page=&limit=` query parameters for paginated listings.
///
/// Page is clamped to at least 1, limit to 1..=100, matching the defaults the
/// admin UI paginator expects.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Paging {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl Paging {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    /// Number of records to skip for the current page.
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_clamps_out_of_range_values() {
        let p = Paging {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn paging_defaults() {
        let p = Paging {
            page: None,
            limit: None,
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn paging_offset() {
        let p = Paging {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(p.offset(), 50);
    }
}
