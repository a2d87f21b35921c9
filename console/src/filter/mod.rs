//! Search, categorical filters, sort and pagination for one view.
//!
//! [`FilterPipeline`] only holds state; [`FilterPipeline::derive`] is a pure
//! function of that state and the source rows, recomputed on every call.

mod page;
mod search;
mod sort;

pub use page::PageWindow;
pub use search::SearchState;
pub use search::any_field_contains;
pub use sort::SortDirection;
pub use sort::SortKey;
pub use sort::SortState;

use crate::config::ConsoleConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::debug;

/// A row type that a [`FilterPipeline`] can filter and sort.
pub trait Filterable {
    type Dimension: Copy + Ord + Debug;
    type SortField: Copy + PartialEq + Debug;

    /// Whether the row matches `value` on `dimension`. Unknown values match
    /// nothing.
    fn matches_filter(&self, dimension: Self::Dimension, value: &str) -> bool;

    /// `needle` is trimmed, lowercase and non-empty.
    fn matches_search(&self, needle: &str) -> bool;

    fn sort_key(&self, field: Self::SortField) -> SortKey<'_>;
}

/// A categorical filter value. `All` removes the predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    All,
    Only(String),
}

impl FilterValue {
    pub const ALL: &str = "all";

    /// `"all"` (any case) and blank input mean no filter.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::ALL) {
            FilterValue::All
        } else {
            FilterValue::Only(trimmed.to_string())
        }
    }
}

impl From<&str> for FilterValue {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Filtered, sorted rows plus the clamped page window over them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Derived<T> {
    items: Vec<T>,
    page: PageWindow,
}

impl<T> Derived<T> {
    pub fn filtered(&self) -> &[T] {
        &self.items
    }

    pub fn paginated(&self) -> &[T] {
        &self.items[self.page.range()]
    }

    pub fn page(&self) -> PageWindow {
        self.page
    }

    pub fn into_page(mut self) -> (Vec<T>, PageWindow) {
        let range = self.page.range();
        self.items.truncate(range.end);
        let rows = self.items.split_off(range.start);
        (rows, self.page)
    }
}

#[derive(Clone, Debug)]
pub struct FilterPipeline<D, F> {
    search: SearchState,
    filters: BTreeMap<D, String>,
    sort: Option<SortState<F>>,
    page: usize,
    page_size: usize,
}

impl<D, F> FilterPipeline<D, F>
where
    D: Copy + Ord + Debug,
    F: Copy + PartialEq + Debug,
{
    pub fn new(page_size: usize, min_search_chars: usize) -> Self {
        Self {
            search: SearchState::new(min_search_chars),
            filters: BTreeMap::new(),
            sort: None,
            page: 1,
            page_size,
        }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.page_size, config.min_search_chars)
    }

    pub fn raw_search_text(&self) -> &str {
        self.search.raw()
    }

    pub fn debounced_search_text(&self) -> &str {
        self.search.committed()
    }

    pub fn effective_search_text(&self) -> Option<&str> {
        self.search.effective()
    }

    /// Echo input immediately; filtering waits for [`Self::commit_search`].
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search.set_raw(text.into());
    }

    /// Commit debounced text. A change of the effective search moves back
    /// to the first page.
    pub fn commit_search(&mut self, text: impl Into<String>) -> bool {
        let changed = self.search.commit(text.into());
        if changed {
            self.reset_page();
        }
        changed
    }

    pub fn set_filter(&mut self, dimension: D, value: FilterValue) {
        match value {
            FilterValue::All => {
                self.filters.remove(&dimension);
            }
            FilterValue::Only(value) => {
                self.filters.insert(dimension, value);
            }
        }
        debug!(?dimension, "filter changed; page reset");
        self.reset_page();
    }

    pub fn filter(&self, dimension: D) -> Option<&str> {
        self.filters.get(&dimension).map(String::as_str)
    }

    pub fn active_filters(&self) -> impl Iterator<Item = (D, &str)> {
        self.filters
            .iter()
            .map(|(dimension, value)| (*dimension, value.as_str()))
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.reset_page();
    }

    pub fn toggle_sort(&mut self, field: F) {
        self.sort = Some(SortState::toggled(self.sort, field));
    }

    pub fn sort(&self) -> Option<SortState<F>> {
        self.sort
    }

    /// Requested page; clamped against the row count at derivation time.
    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// AND of every active filter and the effective search, then a stable
    /// sort, then the page window.
    pub fn derive<T, I>(&self, source: I) -> Derived<T>
    where
        I: IntoIterator<Item = T>,
        T: Filterable<Dimension = D, SortField = F>,
    {
        let needle = self.effective_search_text().map(str::to_lowercase);
        let mut items: Vec<T> = source
            .into_iter()
            .filter(|row| {
                self.filters
                    .iter()
                    .all(|(dimension, value)| row.matches_filter(*dimension, value))
            })
            .filter(|row| needle.as_deref().is_none_or(|needle| row.matches_search(needle)))
            .collect();

        if let Some(SortState { field, direction }) = self.sort {
            items.sort_by(|a, b| direction.apply(a.sort_key(field).compare(&b.sort_key(field))));
        }

        let page = PageWindow::clamp(self.page, self.page_size, items.len());
        Derived { items, page }
    }
}

/// Search and paging controls without the row type, so pipelines over
/// different rows can be addressed through one handle.
pub trait PipelineControls {
    fn raw_search_text(&self) -> &str;
    fn effective_search_text(&self) -> Option<&str>;
    fn set_search_text(&mut self, text: String);
    fn commit_search(&mut self, text: String) -> bool;
    fn current_page(&self) -> usize;
    fn set_page(&mut self, page: usize);
    fn reset_page(&mut self);
}

impl<D, F> PipelineControls for FilterPipeline<D, F>
where
    D: Copy + Ord + Debug,
    F: Copy + PartialEq + Debug,
{
    fn raw_search_text(&self) -> &str {
        FilterPipeline::raw_search_text(self)
    }

    fn effective_search_text(&self) -> Option<&str> {
        FilterPipeline::effective_search_text(self)
    }

    fn set_search_text(&mut self, text: String) {
        FilterPipeline::set_search_text(self, text);
    }

    fn commit_search(&mut self, text: String) -> bool {
        FilterPipeline::commit_search(self, text)
    }

    fn current_page(&self) -> usize {
        FilterPipeline::current_page(self)
    }

    fn set_page(&mut self, page: usize) {
        FilterPipeline::set_page(self, page);
    }

    fn reset_page(&mut self) {
        FilterPipeline::reset_page(self);
    }
}
