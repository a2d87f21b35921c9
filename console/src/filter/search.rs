/// Raw and committed search text for one pipeline.
///
/// `raw` echoes the input immediately; `committed` is what the debounce (or
/// an explicit flush) last delivered. Only the committed text filters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    raw: String,
    committed: String,
    min_chars: usize,
}

impl SearchState {
    pub fn new(min_chars: usize) -> Self {
        Self {
            raw: String::new(),
            committed: String::new(),
            min_chars,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn set_raw(&mut self, text: String) {
        self.raw = text;
    }

    /// Commit `text`; returns whether the effective search changed.
    pub fn commit(&mut self, text: String) -> bool {
        let before = self.effective().map(str::to_owned);
        self.committed = text;
        before.as_deref() != self.effective()
    }

    /// Trimmed committed text, or `None` when it is shorter than the
    /// threshold.
    pub fn effective(&self) -> Option<&str> {
        let trimmed = self.committed.trim();
        (trimmed.chars().count() >= self.min_chars).then_some(trimmed)
    }
}

/// Case-insensitive substring match against any of `fields`. `needle` must
/// already be lowercase.
pub fn any_field_contains<'a>(needle: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}
