//! Notification relay between the core and the host UI.
//!
//! The core only emits notifications; showing and dismissing them belongs to
//! the host.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Display options for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyOptions {
    /// How long the host should show it, in milliseconds
    pub duration_ms: u32,
    /// Stays until dismissed when set
    pub persistent: bool,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            duration_ms: 5000,
            persistent: false,
        }
    }
}

impl NotifyOptions {
    pub fn duration(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }
}

/// Receiver of user-facing notifications. Fire-and-forget.
pub trait Notifier {
    fn notify(&self, kind: NotificationKind, message: &str, options: NotifyOptions);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _: NotificationKind, _: &str, _: NotifyOptions) {}
}

/// Forwards notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotificationKind, message: &str, _: NotifyOptions) {
        match kind {
            NotificationKind::Error => tracing::error!("{}", message),
            NotificationKind::Warning => tracing::warn!("{}", message),
            NotificationKind::Success | NotificationKind::Info => tracing::info!("{}", message),
        }
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub options: NotifyOptions,
}

/// Keeps every notification in memory, for hosts that poll and for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything received so far.
    pub fn take(&self) -> Vec<Notification> {
        match self.received.lock() {
            Ok(mut received) => std::mem::take(&mut *received),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str, options: NotifyOptions) {
        let notification = Notification {
            kind,
            message: message.to_string(),
            options,
        };
        match self.received.lock() {
            Ok(mut received) => received.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
