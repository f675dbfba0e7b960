use std::fmt;

use serde::{Deserialize, Serialize};

/// A trimmed, non-empty search query. Identity is its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Returns `None` when `raw` is empty after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One grid cell. Link targets are kept exactly as collected; relative-hash
/// targets are only resolved when a report is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultCell {
    Link { text: String, href: String },
    Text(String),
}

impl ResultCell {
    pub fn text(&self) -> &str {
        match self {
            ResultCell::Link { text, .. } => text,
            ResultCell::Text(text) => text,
        }
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            ResultCell::Link { href, .. } => Some(href),
            ResultCell::Text(_) => None,
        }
    }
}

impl From<&str> for ResultCell {
    fn from(text: &str) -> Self {
        ResultCell::Text(text.to_string())
    }
}

/// Cells in the column order the grid displayed them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRow(pub Vec<ResultCell>);

impl ResultRow {
    pub fn cells(&self) -> &[ResultCell] {
        &self.0
    }
}

impl FromIterator<ResultCell> for ResultRow {
    fn from_iter<I: IntoIterator<Item = ResultCell>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub rows: Vec<ResultRow>,
}

/// Rows per category label, in the order the tabs were visited.
///
/// The label is the key: inserting a label that is already present
/// replaces its rows in place and keeps the original position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryResult {
    entries: Vec<Category>,
}

impl CategoryResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `rows` under `label`, returning the rows it replaced if the
    /// label was already present.
    pub fn insert(&mut self, label: impl Into<String>, rows: Vec<ResultRow>) -> Option<Vec<ResultRow>> {
        let label = label.into();
        match self.entries.iter_mut().find(|entry| entry.label == label) {
            Some(existing) => Some(std::mem::replace(&mut existing.rows, rows)),
            None => {
                self.entries.push(Category { label, rows });
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&[ResultRow]> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.rows.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.entries.iter().map(|entry| entry.rows.len()).sum()
    }
}

/// Result of processing one term. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TermOutcome {
    Success {
        term: SearchTerm,
        categories: CategoryResult,
    },
    Failure {
        term: SearchTerm,
        error: String,
    },
}

impl TermOutcome {
    pub fn success(term: SearchTerm, categories: CategoryResult) -> Self {
        TermOutcome::Success { term, categories }
    }

    pub fn failure(term: SearchTerm, error: impl Into<String>) -> Self {
        TermOutcome::Failure {
            term,
            error: error.into(),
        }
    }

    pub fn term(&self) -> &SearchTerm {
        match self {
            TermOutcome::Success { term, .. } | TermOutcome::Failure { term, .. } => term,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TermOutcome::Failure { .. })
    }
}

/// Outcomes in input order plus whether the user cut the run short.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunResult {
    outcomes: Vec<TermOutcome>,
    cancelled: bool,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: TermOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn outcomes(&self) -> &[TermOutcome] {
        &self.outcomes
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}
