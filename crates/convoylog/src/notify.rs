//! User-facing notifications.
//!
//! Outcome messages (saved, failed, cleared) are values routed through a
//! [`NotificationSink`] that is constructed once at startup and passed to
//! whatever raises them. There is no process-wide handle; surfaces that
//! cannot display anything simply receive no sink.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Error,
    /// Something needs attention but nothing failed.
    Warning,
    /// Neutral information.
    Info,
}

impl Severity {
    /// Default display duration for this severity.
    ///
    /// Errors linger a second longer than everything else.
    #[must_use]
    pub const fn default_duration(self) -> Duration {
        match self {
            Self::Error => Duration::from_millis(5000),
            Self::Success | Self::Warning | Self::Info => Duration::from_millis(4000),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "succès"),
            Self::Error => write!(f, "erreur"),
            Self::Warning => write!(f, "attention"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The message text shown to the operator.
    pub message: String,

    /// How the message should be styled.
    pub severity: Severity,

    /// How long a displaying surface should keep the message visible.
    pub duration: Duration,
}

impl Notification {
    /// Create a notification with an explicit duration.
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity, duration: Duration) -> Self {
        Self {
            message: message.into(),
            severity,
            duration,
        }
    }

    /// A success message with the default duration.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_default_duration(message, Severity::Success)
    }

    /// An error message with the default duration.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_default_duration(message, Severity::Error)
    }

    /// A warning message with the default duration.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_default_duration(message, Severity::Warning)
    }

    /// An informational message with the default duration.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_default_duration(message, Severity::Info)
    }

    fn with_default_duration(message: impl Into<String>, severity: Severity) -> Self {
        Self::new(message, severity, severity.default_duration())
    }
}

/// Sink for user-facing notifications.
///
/// Implementations own the dismissal semantics: a transient overlay honors
/// [`Notification::duration`], a terminal just prints and moves on.
pub trait NotificationSink: Send + Sync {
    /// Display a notification.
    fn notify(&self, notification: Notification);

    /// Dismiss whatever is currently displayed, if the surface supports it.
    fn dismiss(&self) {}
}

/// Sink that prints notifications as severity-tagged lines on stderr.
///
/// Stdout stays reserved for command output, so notifications never
/// corrupt piped or `--format json` results. `dismiss` is a no-op; a
/// printed line cannot be taken back.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink;

impl TerminalSink {
    /// Create a terminal sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TerminalSink {
    fn notify(&self, notification: Notification) {
        eprintln!("[{}] {}", notification.severity, notification.message);
    }
}

/// Sink that records notifications instead of displaying them.
///
/// Intended for tests that assert on what the user would have seen.
#[derive(Debug, Default)]
pub struct MemorySink {
    notifications: Mutex<Vec<Notification>>,
}

impl MemorySink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far, in order.
    #[must_use]
    pub fn recorded(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The messages notified so far, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.recorded().into_iter().map(|n| n.message).collect()
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }

    fn dismiss(&self) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
