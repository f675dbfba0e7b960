//! Per-term traversal: search, then every category tab, then every page.

use std::collections::HashSet;
use std::time::Duration;

use sweep_core::{CategoryResult, ResultRow, SearchTerm};
use sweep_logging::{sweep_debug, sweep_error, sweep_info, sweep_warn};
use tokio_util::sync::CancellationToken;

use crate::surface::{CategoryTab, UiSurface};
use crate::wait::{delay, wait_until};
use crate::{SweepError, SweepSettings};

/// Collects every category and page of results for one term.
///
/// Any error discards what was read so far; nothing partial escapes.
pub async fn collect_term<S>(
    surface: &S,
    term: &SearchTerm,
    settings: &SweepSettings,
    cancel: &CancellationToken,
) -> Result<CategoryResult, SweepError>
where
    S: UiSurface + ?Sized,
{
    ensure_active(cancel)?;

    if surface.find_search_input().await.is_none() {
        sweep_error!("search input not found while searching {:?}", term.as_str());
        return Err(SweepError::InputNotFound);
    }

    surface.submit_search(term).await;
    settle(cancel, settings.search_settle).await?;

    wait_until(
        cancel,
        settings.results_timeout,
        settings.results_poll_interval,
        move || async move { surface.results_present().await.then_some(()) },
    )
    .await
    .map_err(|err| err.or_timeout(SweepError::SearchTimeout))?;

    let tabs = wait_until(
        cancel,
        settings.tabs_timeout,
        settings.tabs_poll_interval,
        move || async move {
            let tabs = surface.list_category_tabs().await;
            tabs.iter().any(|tab| !tab.label.is_empty()).then_some(tabs)
        },
    )
    .await
    .map_err(|err| err.or_timeout(SweepError::TabsTimeout))?;

    sweep_info!("{:?}: {} categories", term.as_str(), tabs.len());

    let mut categories = CategoryResult::new();
    for tab in tabs {
        ensure_active(cancel)?;
        let rows = collect_tab(surface, &tab, settings, cancel).await?;
        sweep_debug!("{:?} / {:?}: {} rows", term.as_str(), tab.label, rows.len());
        if categories.insert(tab.label.clone(), rows).is_some() {
            sweep_warn!(
                "{:?}: category label {:?} appeared twice; keeping the later tab's rows",
                term.as_str(),
                tab.label
            );
        }
    }

    Ok(categories)
}

async fn collect_tab<S>(
    surface: &S,
    tab: &CategoryTab,
    settings: &SweepSettings,
    cancel: &CancellationToken,
) -> Result<Vec<ResultRow>, SweepError>
where
    S: UiSurface + ?Sized,
{
    surface.activate_tab(&tab.handle).await;
    settle(cancel, settings.tab_settle).await?;

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut pages_read = 0usize;
    loop {
        ensure_active(cancel)?;

        if let Some(fingerprint) = surface.read_pager_fingerprint().await {
            if !seen.insert(fingerprint.clone()) {
                sweep_debug!(
                    "{:?}: pager repeated {:?}, stopping",
                    tab.label,
                    fingerprint.as_str()
                );
                break;
            }
        }

        let page_rows = surface.read_current_grid_rows().await;
        pages_read += 1;
        sweep_debug!("{:?} page {}: {} rows", tab.label, pages_read, page_rows.len());
        rows.extend(page_rows);

        if pages_read >= settings.max_pages_per_tab {
            sweep_warn!(
                "{:?}: stopped after {} pages without reaching the last one",
                tab.label,
                pages_read
            );
            break;
        }

        match surface.find_next_page_control().await {
            Some(next) => {
                surface.advance_page(&next).await;
                settle(cancel, settings.page_settle).await?;
            }
            None => break,
        }
    }

    Ok(rows)
}

fn ensure_active(cancel: &CancellationToken) -> Result<(), SweepError> {
    if cancel.is_cancelled() {
        Err(SweepError::Cancelled)
    } else {
        Ok(())
    }
}

async fn settle(cancel: &CancellationToken, duration: Duration) -> Result<(), SweepError> {
    delay(cancel, duration)
        .await
        .map_err(|_| SweepError::Cancelled)
}
