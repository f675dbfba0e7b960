//! Sweep core: the collected-data model, term intake and the report compiler.
//!
//! Everything here is pure; the engine crate owns timing, IO and the UI surface.
mod escape;
mod model;
mod report;
mod terms;

pub use escape::escape_html;
pub use model::{Category, CategoryResult, ResultCell, ResultRow, RunResult, SearchTerm, TermOutcome};
pub use report::{
    account_name_from_placeholder, compile_report, format_count, ReportOptions,
    DEFAULT_ACCOUNT_NAME, DEFAULT_BASE_URL,
};
pub use terms::parse_terms;
