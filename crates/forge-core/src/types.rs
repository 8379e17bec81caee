//! Common identifier and sort types

use serde::{Deserialize, Serialize};

/// Database identifier type used across all entities
pub type Id = i64;

/// Sort direction for list endpoints
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A single ordering criterion, parsed from `ordering=field` /
/// `ordering=-field` query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub direction: SortDirection,
}

impl Ordering {
    /// Parse a comma-separated ordering string. A leading `-` marks a
    /// descending field, matching the REST API convention.
    pub fn parse(ordering: &str) -> Vec<Self> {
        ordering
            .split(',')
            .filter_map(|part| {
                let part = part.trim();
                if part.is_empty() {
                    return None;
                }
                let (field, direction) = match part.strip_prefix('-') {
                    Some(field) => (field.to_string(), SortDirection::Desc),
                    None => (part.to_string(), SortDirection::Asc),
                };
                Some(Ordering { field, direction })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_parse() {
        let parsed = Ordering::parse("-created_at,name, ");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].field, "created_at");
        assert_eq!(parsed[0].direction, SortDirection::Desc);
        assert_eq!(parsed[1].field, "name");
        assert_eq!(parsed[1].direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_direction_sql() {
        assert_eq!(SortDirection::Asc.as_sql(), "ASC");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }
}
