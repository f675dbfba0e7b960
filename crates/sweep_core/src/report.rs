use std::fmt::Write;

use url::Url;

use crate::escape::escape_html;
use crate::{CategoryResult, ResultCell, ResultRow, RunResult, TermOutcome};

pub const DEFAULT_ACCOUNT_NAME: &str = "Clio Account";
pub const DEFAULT_BASE_URL: &str = "https://app.clio.com/nc/";

const STYLE: &str = "\
body { font-family: sans-serif; margin: 24px; }
h2 { margin-top: 2em; }
table { font-size: 0.95em; border-collapse: collapse; margin: 8px 0; }
.error { color: #b00; }
.cancelled { color: #b00; font-weight: bold; }
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub account_name: String,
    /// Prefixed to `#/...` link targets.
    pub base_url: String,
    /// Rendered verbatim in the header; the compiler never reads a clock.
    pub generated_at: String,
}

impl ReportOptions {
    pub fn new(account_name: Option<String>, generated_at: impl Into<String>) -> Self {
        Self {
            account_name: account_name.unwrap_or_else(|| DEFAULT_ACCOUNT_NAME.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            generated_at: generated_at.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Pulls the account name out of a search placeholder such as
/// `Search Gartner + Bloom, P.C.`. The word may appear anywhere, so
/// `Quick Search Acme` yields `Acme`.
pub fn account_name_from_placeholder(placeholder: &str) -> Option<String> {
    let line = placeholder.lines().last().unwrap_or_default();
    let (_, rest) = line.split_once("Search ")?;
    let name = rest.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Renders a run as a self-contained HTML document.
///
/// Pure: the same run and options always produce the same bytes.
pub fn compile_report(run: &RunResult, options: &ReportOptions) -> String {
    let mut html = String::new();
    let account = escape_html(&options.account_name);

    let _ = write!(
        html,
        "<html><head><meta charset=\"utf-8\"><title>Clio Conflict Check Report for {account}</title>\n\
         <style>\n{STYLE}</style>\n</head><body>\n\
         <h1>Clio Conflict Check Report for {account}</h1>\n\
         <p>Generated: {generated}</p>\n",
        generated = escape_html(&options.generated_at),
    );

    if run.is_cancelled() {
        let processed = run.len();
        let _ = writeln!(
            html,
            "<p class=\"cancelled\">Conflict check cancelled by user after {processed} term{s}; \
             this report is incomplete.</p>",
            s = plural_suffix(processed),
        );
    }

    for outcome in run.outcomes() {
        let _ = writeln!(
            html,
            "<h2>Search Term: <span style=\"color:#0077cc\">{}</span></h2>",
            escape_html(outcome.term().as_str())
        );
        match outcome {
            TermOutcome::Failure { error, .. } => {
                let _ = writeln!(html, "<div class=\"error\">Error: {}</div>", escape_html(error));
            }
            TermOutcome::Success { categories, .. } => render_categories(&mut html, categories, options),
        }
    }

    html.push_str("</body></html>\n");
    html
}

fn render_categories(html: &mut String, categories: &CategoryResult, options: &ReportOptions) {
    for category in categories.iter() {
        let count = category.rows.len();
        let _ = writeln!(
            html,
            "<h3>{} ({} result{})</h3>",
            escape_html(&category.label),
            format_count(count),
            plural_suffix(count),
        );
        render_table(html, &category.rows, &options.base_url);
    }
}

fn render_table(html: &mut String, rows: &[ResultRow], base_url: &str) {
    if rows.is_empty() {
        html.push_str("<em>No results</em>\n");
        return;
    }
    html.push_str("<table border=\"1\" cellpadding=\"4\">\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for (index, cell) in row.cells().iter().enumerate() {
            match (index, link_target(cell, base_url)) {
                (0, Some(url)) => {
                    let _ = write!(
                        html,
                        "<td><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></td>",
                        escape_html(&url),
                        escape_html(cell.text())
                    );
                }
                _ => {
                    let _ = write!(html, "<td>{}</td>", escape_html(cell.text()));
                }
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}

const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Only `#/` targets, relative paths and the schemes in [`LINK_SCHEMES`]
/// become links. The href is normalised the way a browser's URL parser
/// would read it before the scheme is checked.
fn link_target(cell: &ResultCell, base_url: &str) -> Option<String> {
    let href: String = cell
        .href()?
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    let href = href.trim_matches(|c: char| c <= ' ');
    if href.is_empty() {
        return None;
    }
    if href.starts_with("#/") {
        return Some(format!("{base_url}{href}"));
    }
    match Url::parse(href) {
        Ok(url) if LINK_SCHEMES.contains(&url.scheme()) => Some(href.to_string()),
        Ok(_) => None,
        Err(url::ParseError::RelativeUrlWithoutBase) => Some(href.to_string()),
        Err(_) => None,
    }
}

fn plural_suffix(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// en-US grouping: `1234567` becomes `1,234,567`.
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_use_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn placeholder_yields_account_name() {
        assert_eq!(
            account_name_from_placeholder("Search Gartner + Bloom, P.C.").as_deref(),
            Some("Gartner + Bloom, P.C.")
        );
        assert_eq!(
            account_name_from_placeholder("Quick Search Acme Legal").as_deref(),
            Some("Acme Legal")
        );
        assert_eq!(account_name_from_placeholder("Search"), None);
        assert_eq!(account_name_from_placeholder("Search   "), None);
        assert_eq!(account_name_from_placeholder("Find things"), None);
    }

    #[test]
    fn hash_targets_are_resolved_against_base() {
        let cell = ResultCell::Link {
            text: "Acme".into(),
            href: "#/contacts/12".into(),
        };
        assert_eq!(
            link_target(&cell, DEFAULT_BASE_URL).as_deref(),
            Some("https://app.clio.com/nc/#/contacts/12")
        );
    }

    fn link(href: &str) -> ResultCell {
        ResultCell::Link {
            text: "x".into(),
            href: href.into(),
        }
    }

    #[test]
    fn script_targets_are_not_links() {
        for href in [
            "JavaScript:alert(1)",
            "java\tscript:alert(1)",
            "java\nscript:alert(1)",
            "jav\r\nascript:alert(1)",
            "\u{1}javascript:alert(1)",
            " \u{1f}\u{0}javascript:alert(1)\u{7}",
            "vbscript:msgbox(1)",
            "data:text/html,<script>alert(1)</script>",
        ] {
            assert_eq!(link_target(&link(href), DEFAULT_BASE_URL), None, "{href:?}");
        }
    }

    #[test]
    fn web_mail_and_relative_targets_stay_links() {
        let padded = link(" https://app.clio.com/nc/#/matters/3 ");
        assert_eq!(
            link_target(&padded, DEFAULT_BASE_URL).as_deref(),
            Some("https://app.clio.com/nc/#/matters/3")
        );
        assert_eq!(
            link_target(&link("mailto:intake@example.com"), DEFAULT_BASE_URL).as_deref(),
            Some("mailto:intake@example.com")
        );
        assert_eq!(
            link_target(&link("/nc/contacts/9"), DEFAULT_BASE_URL).as_deref(),
            Some("/nc/contacts/9")
        );
        assert_eq!(
            link_target(&link("#/con\ttacts/4"), DEFAULT_BASE_URL).as_deref(),
            Some("https://app.clio.com/nc/#/contacts/4")
        );
    }
}
