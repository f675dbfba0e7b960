use std::fmt::Write;

use sha2::{Digest, Sha256};
use sweep_core::SearchTerm;

const MAX_ACCOUNT_CHARS: usize = 60;

/// Windows-safe, deterministic stem: `conflict-check--{account}--{hash(terms)}`.
///
/// The same account and term list always map to the same file, so a rerun
/// replaces the earlier report instead of piling up copies.
pub fn report_file_stem(account_name: &str, terms: &[SearchTerm]) -> String {
    format!(
        "conflict-check--{}--{}",
        sanitize_component(account_name),
        terms_hash(terms)
    )
}

fn sanitize_component(input: &str) -> String {
    let mut out = String::new();
    let mut pending_separator = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() || matches!(ch, '-' | '.') {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }
    let mut out: String = out
        .trim_matches('.')
        .chars()
        .take(MAX_ACCOUNT_CHARS)
        .collect();
    if out.is_empty() {
        out.push_str("account");
    }
    out
}

fn terms_hash(terms: &[SearchTerm]) -> String {
    let mut hasher = Sha256::new();
    for term in terms {
        hasher.update(term.as_str().as_bytes());
        hasher.update([b'\n']);
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> Vec<SearchTerm> {
        list.iter().filter_map(|t| SearchTerm::new(t)).collect()
    }

    #[test]
    fn stem_is_stable_and_safe() {
        let a = report_file_stem("Gartner + Bloom, P.C.", &terms(&["acme", "globex"]));
        let b = report_file_stem("Gartner + Bloom, P.C.", &terms(&["acme", "globex"]));
        assert_eq!(a, b);
        assert!(a.starts_with("conflict-check--Gartner_Bloom_P.C--"));
        assert!(!a.contains(['/', '\\', ':', '*', '?', '"', '<', '>', '|', ' ', ',']));
    }

    #[test]
    fn term_order_changes_the_hash() {
        let a = report_file_stem("x", &terms(&["acme", "globex"]));
        let b = report_file_stem("x", &terms(&["globex", "acme"]));
        assert_ne!(a, b);
    }

    #[test]
    fn unusable_account_names_fall_back() {
        assert_eq!(sanitize_component("%%%"), "account");
        assert_eq!(sanitize_component("..."), "account");
        assert!(report_file_stem("", &terms(&["acme"])).starts_with("conflict-check--account--"));
    }
}
