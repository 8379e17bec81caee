//! Match highlighting for search results

/// Wrap the first case-insensitive occurrence of `query` in `<mark>` tags.
/// Returns the text untouched when there is no match.
pub fn highlight_match(query: &str, text: &str) -> String {
    if query.is_empty() || text.is_empty() {
        return text.to_string();
    }

    let text_lower = text.to_lowercase();
    let query_lower = query.to_lowercase();

    match text_lower.find(&query_lower) {
        Some(start) if text.is_char_boundary(start) => {
            // The lowercase offsets only map back cleanly for same-length
            // case folds; fall back to the plain text otherwise.
            let end = start + query_lower.len();
            if !text.is_char_boundary(end) || end > text.len() {
                return text.to_string();
            }
            format!(
                "{}<mark>{}</mark>{}",
                &text[..start],
                &text[start..end],
                &text[end..]
            )
        }
        _ => text.to_string(),
    }
}

/// Highlight against the first non-empty candidate
pub fn highlight_first<'a>(query: &str, candidates: &[Option<&'a str>]) -> String {
    let text = candidates
        .iter()
        .flatten()
        .find(|s| !s.is_empty())
        .copied()
        .unwrap_or("");
    highlight_match(query, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_case_insensitive() {
        assert_eq!(
            highlight_match("bosch", "Filtro BOSCH original"),
            "Filtro <mark>BOSCH</mark> original"
        );
    }

    #[test]
    fn test_no_match_returns_text() {
        assert_eq!(highlight_match("mann", "Filtro BOSCH"), "Filtro BOSCH");
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(highlight_match("", "Filtro"), "Filtro");
    }

    #[test]
    fn test_only_first_occurrence_marked() {
        assert_eq!(
            highlight_match("fil", "Filtro de aceite, filtro fino"),
            "<mark>Fil</mark>tro de aceite, filtro fino"
        );
    }

    #[test]
    fn test_highlight_first_skips_empty() {
        assert_eq!(
            highlight_first("flt", &[None, Some(""), Some("FLT-00017")]),
            "<mark>FLT</mark>-00017"
        );
    }
}
