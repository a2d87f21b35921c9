//! Core of the property-management console.
//!
//! [`PropertyConsole`] ties together the site/building selection, one
//! [`FilterPipeline`] per tab, the parking assignment rules and the
//! aggregate statistics, all computed over an [`estate_model::EntityGraph`].
//! Data arrives through a [`CollectionFetcher`]; user-facing outcomes leave
//! through a [`Notifier`].

pub mod config;
mod console;
mod debounce;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod notify;
pub mod parking;
pub mod selection;
pub mod stats;
pub mod views;

#[cfg(test)]
mod test_support;

pub use config::ConsoleConfig;
pub use config::GuestCountScope;
pub use console::ConsoleEvent;
pub use console::FilterChange;
pub use console::PropertyConsole;
pub use console::SortChange;
pub use debounce::Debouncer;
pub use error::ConsoleError;
pub use error::ParkingError;
pub use error::Result;
pub use error::ValidationError;
pub use fetch::CollectionFetcher;
pub use fetch::FetchError;
pub use fetch::FetchState;
pub use fetch::JsonFileFetcher;
pub use filter::Derived;
pub use filter::FilterPipeline;
pub use filter::FilterValue;
pub use filter::PageWindow;
pub use notify::Notice;
pub use notify::NoticeLevel;
pub use notify::Notifier;
pub use notify::RecordingNotifier;
pub use notify::TracingNotifier;
pub use selection::BuildingSelectionMode;
pub use selection::SelectionCoordinator;
pub use stats::ParkingStats;
pub use stats::UnitStats;
pub use views::ConsoleTab;
