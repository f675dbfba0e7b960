use std::fmt;

use sweep_core::SearchTerm;

/// Why a single term could not be collected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SweepError {
    #[error("could not find the search input box")]
    InputNotFound,
    #[error("timed out waiting for search results")]
    SearchTimeout,
    #[error("timed out waiting for category tabs")]
    TabsTimeout,
    #[error("cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermProgress {
    /// 1-based.
    pub position: usize,
    pub total: usize,
    pub term: SearchTerm,
}

impl fmt::Display for TermProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processing term {} of {}: \"{}\"",
            self.position, self.total, self.term
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepEvent {
    Started { total: usize },
    TermStarted(TermProgress),
    TermFinished {
        position: usize,
        total: usize,
        failed: bool,
    },
    Finished { processed: usize, cancelled: bool },
}

impl fmt::Display for SweepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepEvent::Started { .. } => write!(f, "Starting conflict check..."),
            SweepEvent::TermStarted(progress) => progress.fmt(f),
            SweepEvent::TermFinished {
                position,
                total,
                failed,
            } => {
                let status = if *failed { "failed" } else { "done" };
                write!(f, "Term {position} of {total} {status}")
            }
            SweepEvent::Finished {
                processed,
                cancelled: true,
            } => write!(f, "Cancelled after {processed} term(s)"),
            SweepEvent::Finished { processed, .. } => {
                write!(f, "Finished {processed} term(s)")
            }
        }
    }
}
