//! Polling-based suspension points.
//!
//! These are the only places a sweep yields to the clock, and both honour
//! the run's cancellation token within one polling interval.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

use crate::SweepError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    #[error("condition not met within {0:?}")]
    TimedOut(Duration),
    #[error("cancelled")]
    Cancelled,
}

impl WaitError {
    /// Maps a timeout to the caller's step-specific error; cancellation
    /// always stays `Cancelled`.
    pub fn or_timeout(self, timeout: SweepError) -> SweepError {
        match self {
            WaitError::TimedOut(_) => timeout,
            WaitError::Cancelled => SweepError::Cancelled,
        }
    }
}

/// Polls `probe` every `interval` until it yields a value.
///
/// The probe runs once immediately. The deadline is measured from this
/// call, not from any earlier step.
pub async fn wait_until<T, F, Fut>(
    cancel: &CancellationToken,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if cancel.is_cancelled() {
            return Err(WaitError::Cancelled);
        }
        if let Some(value) = probe().await {
            return Ok(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(WaitError::TimedOut(timeout));
        }
        let nap = interval.min(deadline - now);
        tokio::select! {
            _ = cancel.cancelled() => return Err(WaitError::Cancelled),
            _ = sleep(nap) => {}
        }
    }
}

/// Fixed settle wait for UI updates that have no observable signal.
pub async fn delay(cancel: &CancellationToken, duration: Duration) -> Result<(), WaitError> {
    if cancel.is_cancelled() {
        return Err(WaitError::Cancelled);
    }
    tokio::select! {
        _ = cancel.cancelled() => Err(WaitError::Cancelled),
        _ = sleep(duration) => Ok(()),
    }
}
