//! # Notifications
//!
//! Transient, dismissable notices emitted by views after an action
//! settles. Front-ends decide how to show them.

use std::sync::Mutex;
use std::time::Duration;

/// Display time for most notices
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(2000);

/// Display time for notices the user is likely to want to read twice
pub const LONG_NOTICE_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            duration: DEFAULT_NOTICE_DURATION,
        }
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            level: NoticeLevel::Failure,
            message: message.into(),
            duration: DEFAULT_NOTICE_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Sink for notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Prints notices to the terminal as they arrive
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!("Notice ({:?}, {:?}): {}", notice.level, notice.duration, notice.message);
        match notice.level {
            NoticeLevel::Success => println!("✓ {}", notice.message),
            NoticeLevel::Failure => eprintln!("✗ {}", notice.message),
        }
    }
}

/// Keeps notices until they are taken
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything logged so far
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}
