use sweep_core::{account_name_from_placeholder, RunResult, SearchTerm, TermOutcome};
use sweep_logging::{sweep_info, sweep_warn};
use tokio_util::sync::CancellationToken;

use crate::collect::collect_term;
use crate::surface::{UiProbe, UiSurface};
use crate::{SweepError, SweepEvent, SweepSettings, TermProgress};

/// Receives progress for whoever is showing status to the user.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: SweepEvent);
}

/// Sink for callers that do not display progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: SweepEvent) {}
}

/// Runs every term, one at a time and in input order.
///
/// A failing term becomes a `Failure` outcome and the run moves on. Once
/// `cancel` fires, terms that have not started are left out entirely and
/// the result is marked cancelled.
pub async fn run_session<S>(
    surface: &S,
    terms: &[SearchTerm],
    settings: &SweepSettings,
    cancel: &CancellationToken,
    sink: &dyn ProgressSink,
) -> RunResult
where
    S: UiSurface + ?Sized,
{
    let total = terms.len();
    let mut run = RunResult::new();
    sink.emit(SweepEvent::Started { total });

    for (index, term) in terms.iter().enumerate() {
        if cancel.is_cancelled() {
            run.mark_cancelled();
            break;
        }

        let progress = TermProgress {
            position: index + 1,
            total,
            term: term.clone(),
        };
        sweep_info!("{progress}");
        sink.emit(SweepEvent::TermStarted(progress));

        let result = collect_term(surface, term, settings, cancel).await;
        let cancelled = matches!(result, Err(SweepError::Cancelled));
        let outcome = match result {
            Ok(categories) => TermOutcome::success(term.clone(), categories),
            Err(err) => {
                sweep_warn!("term {:?} failed: {}", term.as_str(), err);
                TermOutcome::failure(term.clone(), err.to_string())
            }
        };

        sink.emit(SweepEvent::TermFinished {
            position: index + 1,
            total,
            failed: outcome.is_failure(),
        });
        run.push(outcome);

        if cancelled {
            run.mark_cancelled();
            break;
        }
    }

    if run.is_cancelled() {
        sweep_warn!("run cancelled after {} of {} terms", run.len(), total);
    } else {
        sweep_info!(
            "run finished: {} terms, {} failed",
            run.len(),
            run.failure_count()
        );
    }
    sink.emit(SweepEvent::Finished {
        processed: run.len(),
        cancelled: run.is_cancelled(),
    });
    run
}

/// Account name shown in the search box placeholder (`Search <account>`).
pub async fn read_account_name<S>(surface: &S) -> Option<String>
where
    S: UiProbe + ?Sized,
{
    let input = surface.find_search_input().await?;
    input
        .placeholder
        .as_deref()
        .and_then(account_name_from_placeholder)
}
