use crate::SearchTerm;

/// Splits pasted input into search terms, one per line.
///
/// Lines are trimmed and blank lines dropped. Duplicates are kept; each one
/// is searched and reported on its own.
pub fn parse_terms(raw: &str) -> Vec<SearchTerm> {
    raw.lines().filter_map(SearchTerm::new).collect()
}
