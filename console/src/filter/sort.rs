use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use std::cmp::Ordering;
use strum_macros::Display;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SortState<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: PartialEq> SortState<F> {
    /// Same field flips the direction; a new field starts ascending.
    pub fn toggled(current: Option<Self>, field: F) -> Self {
        match current {
            Some(state) if state.field == field => Self {
                field,
                direction: state.direction.flipped(),
            },
            _ => Self {
                field,
                direction: SortDirection::Ascending,
            },
        }
    }
}

/// Comparable projection of one row for one sort field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey<'a> {
    /// Compared case-insensitively.
    Text(&'a str),
    Number(i64),
    /// Missing timestamps sort first.
    Timestamp(Option<DateTime<Utc>>),
    /// Position in an explicit rank table.
    Rank(u8),
}

impl SortKey<'_> {
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
            (SortKey::Number(a), SortKey::Number(b)) => a.cmp(b),
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            (SortKey::Rank(a), SortKey::Rank(b)) => a.cmp(b),
            _ => self.tier().cmp(&other.tier()),
        }
    }

    fn tier(&self) -> u8 {
        match self {
            SortKey::Text(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Timestamp(_) => 2,
            SortKey::Rank(_) => 3,
        }
    }
}
