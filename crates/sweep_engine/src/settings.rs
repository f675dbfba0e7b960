use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use sweep_core::DEFAULT_BASE_URL;

/// Timing and traversal knobs for a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSettings {
    /// Fixed wait after submitting a search, before polling for results.
    pub search_settle: Duration,
    pub results_timeout: Duration,
    pub results_poll_interval: Duration,
    pub tabs_timeout: Duration,
    pub tabs_poll_interval: Duration,
    /// Fixed wait after activating a category tab.
    pub tab_settle: Duration,
    /// Fixed wait after advancing to the next results page.
    pub page_settle: Duration,
    /// Upper bound on pages read per tab when the pager reports no status.
    pub max_pages_per_tab: usize,
    /// Prefix for `#/...` link targets in the report.
    pub base_url: String,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            search_settle: Duration::from_millis(5_000),
            results_timeout: Duration::from_secs(10),
            results_poll_interval: Duration::from_millis(200),
            tabs_timeout: Duration::from_secs(10),
            tabs_poll_interval: Duration::from_millis(150),
            tab_settle: Duration::from_millis(800),
            page_settle: Duration::from_millis(800),
            max_pages_per_tab: 500,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("base_url is not a valid absolute url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// On-disk shape: every field optional, durations in milliseconds.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    search_settle_ms: Option<u64>,
    results_timeout_ms: Option<u64>,
    results_poll_interval_ms: Option<u64>,
    tabs_timeout_ms: Option<u64>,
    tabs_poll_interval_ms: Option<u64>,
    tab_settle_ms: Option<u64>,
    page_settle_ms: Option<u64>,
    max_pages_per_tab: Option<usize>,
    base_url: Option<String>,
}

impl SweepSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    pub fn from_ron(text: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = ron::from_str(text)?;
        let defaults = Self::default();
        let ms = |value: Option<u64>, fallback: Duration| {
            value.map(Duration::from_millis).unwrap_or(fallback)
        };

        let settings = Self {
            search_settle: ms(file.search_settle_ms, defaults.search_settle),
            results_timeout: ms(file.results_timeout_ms, defaults.results_timeout),
            results_poll_interval: ms(
                file.results_poll_interval_ms,
                defaults.results_poll_interval,
            ),
            tabs_timeout: ms(file.tabs_timeout_ms, defaults.tabs_timeout),
            tabs_poll_interval: ms(file.tabs_poll_interval_ms, defaults.tabs_poll_interval),
            tab_settle: ms(file.tab_settle_ms, defaults.tab_settle),
            page_settle: ms(file.page_settle_ms, defaults.page_settle),
            max_pages_per_tab: file.max_pages_per_tab.unwrap_or(defaults.max_pages_per_tab),
            base_url: file.base_url.unwrap_or(defaults.base_url),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        url::Url::parse(&self.base_url)?;
        if self.results_poll_interval.is_zero() {
            return Err(SettingsError::ZeroValue("results_poll_interval_ms"));
        }
        if self.tabs_poll_interval.is_zero() {
            return Err(SettingsError::ZeroValue("tabs_poll_interval_ms"));
        }
        if self.max_pages_per_tab == 0 {
            return Err(SettingsError::ZeroValue("max_pages_per_tab"));
        }
        Ok(())
    }
}
