//! Single funnel for user-visible alerts.
//!
//! Pages that carry an inline alert container show alerts in place; pages
//! without one stash a single pending alert that the next page picks up
//! after the navigation boundary.

use serde::{Deserialize, Serialize};

/// Default display time for transient alerts, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Longer display time for configuration errors, which the user has to act
/// on rather than retry.
pub const CONFIG_TIMEOUT_MS: u64 = 12_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub level: AlertLevel,
    /// Display time in milliseconds; `None` means the alert stays until
    /// dismissed.
    pub timeout_ms: Option<u64>,
}

impl Alert {
    pub fn new(message: impl Into<String>, level: AlertLevel) -> Self {
        Self {
            message: message.into(),
            level,
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, AlertLevel::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, AlertLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, AlertLevel::Warning)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(message, AlertLevel::Danger)
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Alert presentation state for the current page.
///
/// Showing a new alert replaces the previous one; there is never more than
/// one inline alert and one pending alert at a time.
#[derive(Debug, Default)]
pub struct AlertCenter {
    has_container: bool,
    current: Option<Alert>,
    pending: Option<Alert>,
}

impl AlertCenter {
    pub fn new(has_container: bool) -> Self {
        Self {
            has_container,
            current: None,
            pending: None,
        }
    }

    /// Present an alert: inline when the page has a container, otherwise
    /// stashed for the next page to pick up.
    pub fn show(&mut self, alert: Alert) {
        tracing::debug!(level = ?alert.level, "alert: {}", alert.message);
        if self.has_container {
            self.current = Some(alert);
        } else {
            self.pending = Some(alert);
        }
    }

    /// The alert currently displayed inline, if any.
    pub fn current(&self) -> Option<&Alert> {
        self.current.as_ref()
    }

    /// Dismiss the inline alert (user close or timeout elapsed).
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Take the alert deferred across a navigation boundary, clearing it.
    pub fn take_pending(&mut self) -> Option<Alert> {
        self.pending.take()
    }
}
