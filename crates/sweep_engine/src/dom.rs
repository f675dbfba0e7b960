//! Reads the target application's markup.
//!
//! A surface that can obtain the current document as HTML (a captured
//! snapshot, a browser's page source) answers every probe query through
//! [`DomSnapshot`].

use scraper::{ElementRef, Html, Selector};
use sweep_core::{ResultCell, ResultRow};

use crate::surface::{CategoryTab, ControlHandle, PagerFingerprint, SearchInput};

const SEARCH_INPUT: &str = r#"input.k-input[type="text"]"#;
const RESULTS_CONTAINER: &str = "cc-search-categories, .cc-search-categories";
const CATEGORY_TABS: &str = "cc-search-categories ul li a";
const GRID_ROWS: &str = r#".k-grid-content table[role="grid"] tbody tr"#;
const GRID_CELLS: &str = "td";
const CELL_LINK: &str = "a[href]";
const PAGER_INFO: &str = ".k-pager-info";
const NEXT_PAGE: &str = r#"a.k-pager-nav[aria-label="Go to the next page"]:not(.k-state-disabled)"#;

pub struct DomSnapshot {
    doc: Html,
}

impl DomSnapshot {
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    pub fn search_input(&self) -> Option<SearchInput> {
        let input = self.select_first(SEARCH_INPUT)?;
        let placeholder = input
            .value()
            .attr("placeholder")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(ToOwned::to_owned);
        Some(SearchInput { placeholder })
    }

    pub fn results_present(&self) -> bool {
        self.select_first(RESULTS_CONTAINER).is_some()
    }

    pub fn category_tabs(&self) -> Vec<CategoryTab> {
        self.select_all(CATEGORY_TABS)
            .into_iter()
            .enumerate()
            .map(|(index, link)| CategoryTab {
                label: collapsed_text(link),
                handle: ControlHandle::Tab(index),
            })
            .collect()
    }

    pub fn grid_rows(&self) -> Vec<ResultRow> {
        let (Some(cell_sel), Some(link_sel)) = (selector(GRID_CELLS), selector(CELL_LINK)) else {
            return Vec::new();
        };
        self.select_all(GRID_ROWS)
            .into_iter()
            .map(|row| {
                row.select(&cell_sel)
                    .map(|td| read_cell(td, &link_sel))
                    .collect::<ResultRow>()
            })
            .collect()
    }

    pub fn pager_fingerprint(&self) -> Option<PagerFingerprint> {
        let info = self.select_first(PAGER_INFO)?;
        PagerFingerprint::new(&collapsed_text(info))
    }

    pub fn next_page_control(&self) -> Option<ControlHandle> {
        self.select_first(NEXT_PAGE).map(|_| ControlHandle::NextPage)
    }

    fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let sel = selector(css)?;
        self.doc.select(&sel).next()
    }

    fn select_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match selector(css) {
            Some(sel) => self.doc.select(&sel).collect(),
            None => Vec::new(),
        }
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn read_cell(td: ElementRef<'_>, link_sel: &Selector) -> ResultCell {
    let link = td
        .select(link_sel)
        .next()
        .and_then(|a| a.value().attr("href").map(|href| (a, href.trim())))
        .filter(|(_, href)| !href.is_empty());
    match link {
        Some((a, href)) => ResultCell::Link {
            text: collapsed_text(a),
            href: href.to_string(),
        },
        None => ResultCell::Text(collapsed_text(td)),
    }
}

/// Element text with whitespace runs collapsed and the ends trimmed.
fn collapsed_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
