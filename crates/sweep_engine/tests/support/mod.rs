#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sweep_core::{ResultCell, ResultRow, SearchTerm};
use sweep_engine::{
    CancellationToken, CategoryTab, ControlHandle, PagerFingerprint, ProgressSink, SearchInput,
    SweepEvent, SweepSettings, UiDriver, UiProbe,
};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Submit(String),
    Tab(usize),
    NextPage,
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub fingerprint: Option<String>,
    pub rows: Vec<ResultRow>,
    pub has_next: bool,
}

#[derive(Debug, Clone)]
pub struct FakeTab {
    pub label: String,
    pub pages: Vec<FakePage>,
}

pub fn row(cells: &[&str]) -> ResultRow {
    ResultRow(cells.iter().map(|c| ResultCell::from(*c)).collect())
}

/// A tab whose pages carry proper `n/total` fingerprints and a next
/// control on every page but the last.
pub fn paged_tab(label: &str, rows_per_page: &[usize]) -> FakeTab {
    let total = rows_per_page.len();
    let pages = rows_per_page
        .iter()
        .enumerate()
        .map(|(i, count)| FakePage {
            fingerprint: Some(format!("{}/{}", i + 1, total)),
            rows: (0..*count)
                .map(|r| row(&[&format!("{label} p{} r{r}", i + 1)]))
                .collect(),
            has_next: i + 1 < total,
        })
        .collect();
    FakeTab {
        label: label.to_string(),
        pages,
    }
}

pub fn single_page_tab(label: &str, rows: Vec<ResultRow>) -> FakeTab {
    FakeTab {
        label: label.to_string(),
        pages: vec![FakePage {
            fingerprint: None,
            rows,
            has_next: false,
        }],
    }
}

#[derive(Debug)]
struct Active {
    term: String,
    submitted_at: Instant,
    tab: usize,
    page: usize,
}

/// Scripted stand-in for the application, recording every driver call.
pub struct FakeSurface {
    pub has_input: bool,
    pub placeholder: Option<String>,
    /// `None` means the results container never renders.
    pub results_after: Option<Duration>,
    pub searches: HashMap<String, Vec<FakeTab>>,
    calls: Mutex<Vec<Call>>,
    active: Mutex<Option<Active>>,
    cancel_trigger: Mutex<Option<(Call, CancellationToken)>>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            has_input: true,
            placeholder: Some("Search Gartner + Bloom, P.C.".to_string()),
            results_after: Some(Duration::from_millis(300)),
            searches: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            active: Mutex::new(None),
            cancel_trigger: Mutex::new(None),
        }
    }

    pub fn with_search(mut self, term: &str, tabs: Vec<FakeTab>) -> Self {
        self.searches.insert(term.to_string(), tabs);
        self
    }

    /// Cancels `token` as soon as the driver receives `call`.
    pub fn cancel_on(&self, call: Call, token: CancellationToken) {
        *self.cancel_trigger.lock().unwrap() = Some((call, token));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submitted_terms(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Submit(term) => Some(term),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        if let Some((trigger, token)) = self.cancel_trigger.lock().unwrap().as_ref() {
            if *trigger == call {
                token.cancel();
            }
        }
        self.calls.lock().unwrap().push(call);
    }

    fn visible_tabs(&self) -> Option<(Vec<FakeTab>, usize, usize)> {
        let active = self.active.lock().unwrap();
        let active = active.as_ref()?;
        let ready = self
            .results_after
            .is_some_and(|after| active.submitted_at.elapsed() >= after);
        if !ready {
            return None;
        }
        let tabs = self.searches.get(&active.term).cloned().unwrap_or_default();
        Some((tabs, active.tab, active.page))
    }

    fn current_page(&self) -> Option<FakePage> {
        let (tabs, tab, page) = self.visible_tabs()?;
        tabs.get(tab)?.pages.get(page).cloned()
    }
}

#[async_trait::async_trait]
impl UiProbe for FakeSurface {
    async fn find_search_input(&self) -> Option<SearchInput> {
        self.has_input.then(|| SearchInput {
            placeholder: self.placeholder.clone(),
        })
    }

    async fn results_present(&self) -> bool {
        self.visible_tabs().is_some()
    }

    async fn list_category_tabs(&self) -> Vec<CategoryTab> {
        self.visible_tabs()
            .map(|(tabs, _, _)| {
                tabs.into_iter()
                    .enumerate()
                    .map(|(i, tab)| CategoryTab {
                        label: tab.label,
                        handle: ControlHandle::Tab(i),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn read_current_grid_rows(&self) -> Vec<ResultRow> {
        self.current_page().map(|p| p.rows).unwrap_or_default()
    }

    async fn read_pager_fingerprint(&self) -> Option<PagerFingerprint> {
        self.current_page()
            .and_then(|p| p.fingerprint)
            .and_then(|f| PagerFingerprint::new(&f))
    }

    async fn find_next_page_control(&self) -> Option<ControlHandle> {
        self.current_page()
            .filter(|p| p.has_next)
            .map(|_| ControlHandle::NextPage)
    }
}

#[async_trait::async_trait]
impl UiDriver for FakeSurface {
    async fn submit_search(&self, term: &SearchTerm) {
        *self.active.lock().unwrap() = Some(Active {
            term: term.as_str().to_string(),
            submitted_at: Instant::now(),
            tab: 0,
            page: 0,
        });
        self.record(Call::Submit(term.as_str().to_string()));
    }

    async fn activate_tab(&self, handle: &ControlHandle) {
        if let ControlHandle::Tab(index) = handle {
            if let Some(active) = self.active.lock().unwrap().as_mut() {
                active.tab = *index;
                active.page = 0;
            }
            self.record(Call::Tab(*index));
        }
    }

    async fn advance_page(&self, _handle: &ControlHandle) {
        let page_count = {
            let active = self.active.lock().unwrap();
            active.as_ref().and_then(|a| {
                self.searches
                    .get(&a.term)
                    .and_then(|tabs| tabs.get(a.tab))
                    .map(|tab| tab.pages.len())
            })
        };
        if let (Some(count), Some(active)) = (page_count, self.active.lock().unwrap().as_mut()) {
            // A misbehaving pager may offer "next" on the last page; stay put.
            if active.page + 1 < count {
                active.page += 1;
            }
        }
        self.record(Call::NextPage);
    }
}

#[derive(Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SweepEvent>>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels `token` once term `position` (1-based) has finished.
    pub fn cancelling_after(position: usize, token: CancellationToken) -> Self {
        Self {
            events: Arc::default(),
            cancel_after: Some((position, token)),
        }
    }

    pub fn events(&self) -> Vec<SweepEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SweepEvent::TermStarted(progress) => Some(progress.to_string()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: SweepEvent) {
        if let (SweepEvent::TermFinished { position, .. }, Some((after, token))) =
            (&event, &self.cancel_after)
        {
            if position == after {
                token.cancel();
            }
        }
        self.events.lock().unwrap().push(event);
    }
}

pub fn terms(list: &[&str]) -> Vec<SearchTerm> {
    list.iter().filter_map(|t| SearchTerm::new(t)).collect()
}

pub fn settings() -> SweepSettings {
    SweepSettings::default()
}
