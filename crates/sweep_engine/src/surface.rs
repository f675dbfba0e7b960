use sweep_core::{ResultRow, SearchTerm};

/// Identifies a clickable control on the surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlHandle {
    /// Category tab, by position in presentation order.
    Tab(usize),
    NextPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInput {
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTab {
    /// Trimmed display text; may be empty while the tab is still rendering.
    pub label: String,
    pub handle: ControlHandle,
}

/// Pager status text, used only to notice a page that was already read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PagerFingerprint(String);

impl PagerFingerprint {
    /// Returns `None` for blank status text.
    pub fn new(status: &str) -> Option<Self> {
        let trimmed = status.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read-only queries against whatever the application currently shows.
///
/// Absence is a normal answer, never an error.
#[async_trait::async_trait]
pub trait UiProbe: Send + Sync {
    async fn find_search_input(&self) -> Option<SearchInput>;

    async fn results_present(&self) -> bool;

    async fn list_category_tabs(&self) -> Vec<CategoryTab>;

    async fn read_current_grid_rows(&self) -> Vec<ResultRow>;

    async fn read_pager_fingerprint(&self) -> Option<PagerFingerprint>;

    /// Only returns a handle while the control is enabled.
    async fn find_next_page_control(&self) -> Option<ControlHandle>;
}

/// Single best-effort mutations. None of these wait for the UI to react.
#[async_trait::async_trait]
pub trait UiDriver: Send + Sync {
    /// Types `term` into the search field and commits it.
    async fn submit_search(&self, term: &SearchTerm);

    async fn activate_tab(&self, handle: &ControlHandle);

    async fn advance_page(&self, handle: &ControlHandle);
}

/// Both halves of a drivable application surface.
pub trait UiSurface: UiProbe + UiDriver {}

impl<T: UiProbe + UiDriver + ?Sized> UiSurface for T {}
