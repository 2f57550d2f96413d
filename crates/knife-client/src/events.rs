//! Blocking user notices.
//!
//! A notice is the headless counterpart of an alert dialog: the controller
//! hands it to a [`Notifier`] and moves on. Every notice is also recorded
//! as a diagnostic through `tracing`.

use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Receives blocking notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Log and deliver a notice.
pub fn emit_notice(notifier: &dyn Notifier, notice: Notice) {
    match notice.level {
        NoticeLevel::Info => tracing::info!(text = %notice.text, "Notice"),
        NoticeLevel::Error => tracing::error!(text = %notice.text, "Notice"),
    }
    notifier.notify(notice);
}

/// Prints notices on stderr. Used by the command-line front end.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => eprintln!("{}", notice.text),
            NoticeLevel::Error => eprintln!("error: {}", notice.text),
        }
    }
}

/// Keeps every notice in memory, in arrival order.
#[derive(Default)]
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
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}
