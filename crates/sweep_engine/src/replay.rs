//! Replays captured results markup as a drivable surface.
//!
//! A [`ReplayScript`] lists, per search term, the category tab labels and
//! the captured HTML of each results page (grid plus pager). The surface
//! composes the current document from that script and answers every probe
//! through [`DomSnapshot`], so selector behaviour matches a live page.

use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::Deserialize;
use sweep_core::{escape_html, ResultRow, SearchTerm};
use sweep_logging::{sweep_debug, sweep_warn};
use tokio::time::Instant;

use crate::dom::DomSnapshot;
use crate::surface::{CategoryTab, ControlHandle, PagerFingerprint, SearchInput, UiDriver, UiProbe};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayScript {
    /// When false the page has no search box at all.
    #[serde(default = "default_true")]
    pub search_input: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    /// How long after submission the results container appears.
    #[serde(default)]
    pub results_latency_ms: u64,
    #[serde(default)]
    pub searches: Vec<ReplaySearch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplaySearch {
    pub term: String,
    /// Results never render for this term.
    #[serde(default)]
    pub stalled: bool,
    #[serde(default)]
    pub tabs: Vec<ReplayTab>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayTab {
    pub label: String,
    /// Captured HTML fragments, one per results page.
    #[serde(default)]
    pub pages: Vec<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("could not read replay script: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse replay script: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    pub fn from_ron(text: &str) -> Result<Self, ReplayError> {
        Ok(ron::from_str(text)?)
    }
}

#[derive(Debug)]
struct ActiveSearch {
    /// `None` when the script has no entry for the submitted term.
    search: Option<usize>,
    submitted_at: Instant,
    tab: usize,
    page: usize,
}

pub struct ReplaySurface {
    script: ReplayScript,
    state: Mutex<Option<ActiveSearch>>,
}

impl ReplaySurface {
    pub fn new(script: ReplayScript) -> Self {
        Self {
            script,
            state: Mutex::new(None),
        }
    }

    /// Composes the document the application would currently show.
    pub fn render(&self) -> String {
        let mut html = String::from("<html><body>\n");
        if self.script.search_input {
            let placeholder = self.script.placeholder.as_deref().unwrap_or_default();
            html.push_str(&format!(
                "<input class=\"k-input\" type=\"text\" placeholder=\"{}\">\n",
                escape_html(placeholder)
            ));
        }

        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(active) = state.as_ref() {
            let latency = Duration::from_millis(self.script.results_latency_ms);
            let search = active.search.map(|index| &self.script.searches[index]);
            let stalled = search.is_some_and(|s| s.stalled);
            if !stalled && active.submitted_at.elapsed() >= latency {
                let tabs = search.map(|s| s.tabs.as_slice()).unwrap_or_default();
                html.push_str("<cc-search-categories><ul>\n");
                for tab in tabs {
                    html.push_str(&format!(
                        "<li><a href=\"javascript:void(0)\">{}</a></li>\n",
                        escape_html(&tab.label)
                    ));
                }
                html.push_str("</ul></cc-search-categories>\n");
                if let Some(page) = tabs.get(active.tab).and_then(|t| t.pages.get(active.page)) {
                    html.push_str(page);
                    html.push('\n');
                }
            }
        }

        html.push_str("</body></html>\n");
        html
    }

    fn with_snapshot<R>(&self, read: impl FnOnce(&DomSnapshot) -> R) -> R {
        let html = self.render();
        let snapshot = DomSnapshot::parse(&html);
        read(&snapshot)
    }

    fn active_tabs(&self, active: &ActiveSearch) -> &[ReplayTab] {
        active
            .search
            .map(|index| self.script.searches[index].tabs.as_slice())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl UiProbe for ReplaySurface {
    async fn find_search_input(&self) -> Option<SearchInput> {
        self.with_snapshot(DomSnapshot::search_input)
    }

    async fn results_present(&self) -> bool {
        self.with_snapshot(DomSnapshot::results_present)
    }

    async fn list_category_tabs(&self) -> Vec<CategoryTab> {
        self.with_snapshot(DomSnapshot::category_tabs)
    }

    async fn read_current_grid_rows(&self) -> Vec<ResultRow> {
        self.with_snapshot(DomSnapshot::grid_rows)
    }

    async fn read_pager_fingerprint(&self) -> Option<PagerFingerprint> {
        self.with_snapshot(DomSnapshot::pager_fingerprint)
    }

    async fn find_next_page_control(&self) -> Option<ControlHandle> {
        self.with_snapshot(DomSnapshot::next_page_control)
    }
}

#[async_trait::async_trait]
impl UiDriver for ReplaySurface {
    async fn submit_search(&self, term: &SearchTerm) {
        if !self.script.search_input {
            sweep_warn!("replay: no search input to submit {:?} into", term.as_str());
            return;
        }
        let search = self
            .script
            .searches
            .iter()
            .position(|s| s.term.trim() == term.as_str());
        sweep_debug!("replay: submit {:?} (scripted: {})", term.as_str(), search.is_some());
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = Some(ActiveSearch {
            search,
            submitted_at: Instant::now(),
            tab: 0,
            page: 0,
        });
    }

    async fn activate_tab(&self, handle: &ControlHandle) {
        let ControlHandle::Tab(index) = handle else {
            return;
        };
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(active) = state.as_mut() {
            if *index < self.active_tabs(active).len() {
                active.tab = *index;
                active.page = 0;
            }
        }
    }

    async fn advance_page(&self, handle: &ControlHandle) {
        if *handle != ControlHandle::NextPage {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(active) = state.as_mut() {
            let page_count = self
                .active_tabs(active)
                .get(active.tab)
                .map_or(0, |tab| tab.pages.len());
            if active.page + 1 < page_count {
                active.page += 1;
            }
        }
    }
}
