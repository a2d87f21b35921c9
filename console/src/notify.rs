use serde::Serialize;
use std::sync::Mutex;
use strum_macros::Display;
use tracing::error;
use tracing::info;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A user-facing message about a mutation outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Delivery is the collaborator's business; the console only hands notices
/// over.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!(target: "estate::notice", "{}", notice.message),
            NoticeLevel::Warning => warn!(target: "estate::notice", "{}", notice.message),
            NoticeLevel::Error => error!(target: "estate::notice", "{}", notice.message),
        }
    }
}

/// Keeps every notice in memory, newest last.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    pub fn take(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut notices| std::mem::take(&mut *notices))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notice::success("saved"));
        notifier.notify(Notice::error("refused"));
        assert_eq!(
            notifier.take(),
            vec![Notice::success("saved"), Notice::error("refused")]
        );
        assert!(notifier.notices().is_empty());
    }
}
