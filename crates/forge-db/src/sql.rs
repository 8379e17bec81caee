//! SQL literal helpers for dynamically assembled WHERE clauses
//!
//! Filter values arrive from query strings, so anything interpolated into a
//! clause goes through these escapes; bindable positions (limit/offset,
//! write paths) always use `$n` binds instead.

/// Escape a string for use inside a single-quoted SQL literal
pub fn escape_string(s: &str) -> String {
    s.replace('\'', "''")
}

/// Escape a string for use inside an ILIKE pattern
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
        .replace('\'', "''")
}

/// Build an `column ILIKE '%term%'` condition
pub fn ilike_contains(column: &str, term: &str) -> String {
    format!("{} ILIKE '%{}%'", column, escape_like(term))
}

/// Build an `column ILIKE 'term%'` prefix condition
pub fn ilike_starts_with(column: &str, term: &str) -> String {
    format!("{} ILIKE '{}%'", column, escape_like(term))
}

/// Build an OR group of contains-conditions over several columns
pub fn any_column_contains(columns: &[&str], term: &str) -> String {
    let parts: Vec<String> = columns
        .iter()
        .map(|col| ilike_contains(col, term))
        .collect();
    format!("({})", parts.join(" OR "))
}

/// Build an `column = 'value'` condition with escaping
pub fn eq_string(column: &str, value: &str) -> String {
    format!("{} = '{}'", column, escape_string(value))
}

/// Build an ORDER BY column list from an `ordering=` query parameter.
///
/// Fields not in `allowed` are dropped, so only whitelisted columns ever
/// reach the statement. Falls back to `default` when nothing survives.
pub fn order_clause(ordering: Option<&str>, allowed: &[&str], default: &str) -> String {
    let parts: Vec<String> = ordering
        .map(forge_core::Ordering::parse)
        .unwrap_or_default()
        .into_iter()
        .filter(|ord| allowed.contains(&ord.field.as_str()))
        .map(|ord| format!("{} {}", ord.field, ord.direction.as_sql()))
        .collect();
    if parts.is_empty() {
        default.to_string()
    } else {
        parts.join(", ")
    }
}

/// Qualify each column in a comma-separated list with a table alias
pub fn prefix_columns(columns: &str, alias: &str) -> String {
    columns
        .split(',')
        .map(|col| format!("{}.{}", alias, col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("O'Brien"), "O''Brien");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a'b"), "a''b");
    }

    #[test]
    fn test_any_column_contains() {
        let clause = any_column_contains(&["name", "brand"], "bosch");
        assert_eq!(clause, "(name ILIKE '%bosch%' OR brand ILIKE '%bosch%')");
    }

    #[test]
    fn test_eq_string() {
        assert_eq!(eq_string("status", "ACTIVE"), "status = 'ACTIVE'");
    }

    #[test]
    fn test_order_clause_whitelists_fields() {
        let allowed = &["name", "created_at"];
        assert_eq!(
            order_clause(Some("-created_at,name"), allowed, "name"),
            "created_at DESC, name ASC"
        );
        assert_eq!(
            order_clause(Some("password; DROP TABLE x"), allowed, "name"),
            "name"
        );
        assert_eq!(order_clause(None, allowed, "name"), "name");
    }

    #[test]
    fn test_prefix_columns() {
        assert_eq!(prefix_columns("a, b,\n c", "s"), "s.a, s.b, s.c");
    }
}
