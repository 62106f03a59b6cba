//! Notification engine configuration.

use std::time::Duration;

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Settings key the configuration is persisted under.
pub const CONFIG_KEY: &str = "notification_config";

/// Longest accepted reminder window: one year.
const MAX_REMINDER_WINDOW_HOURS: u64 = 24 * 366;

/// Runtime settings of the notification engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// When false the timer keeps running but scans are skipped
    pub enabled: bool,
    /// Seconds between two scan cycles
    pub scan_interval_secs: u64,
    /// How far ahead a due date triggers a `due_date` reminder
    pub reminder_window_hours: u64,
    /// Whether new notifications are also pushed to the alert sink
    pub alerts_enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_interval_secs: 3600,
            reminder_window_hours: 24,
            alerts_enabled: true,
        }
    }
}

impl NotificationConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    pub fn reminder_window(&self) -> SignedDuration {
        SignedDuration::from_hours(self.reminder_window_hours.min(MAX_REMINDER_WINDOW_HOURS) as i64)
    }

    /// Pulls stored values back into the range [`apply`](Self::apply) accepts.
    ///
    /// Used on load; a hand-edited settings row must not give the timer a
    /// zero interval.
    pub fn clamped(self) -> Self {
        Self {
            scan_interval_secs: self.scan_interval_secs.max(1),
            reminder_window_hours: self
                .reminder_window_hours
                .clamp(1, MAX_REMINDER_WINDOW_HOURS),
            ..self
        }
    }

    /// Returns a copy with `update` applied.
    ///
    /// # Errors
    ///
    /// `PlannerError::InvalidInput` for a zero scan interval or a reminder
    /// window outside 1 hour to 1 year. `self` is left as it was.
    pub fn apply(&self, update: &NotificationConfigUpdate) -> Result<Self> {
        let mut next = *self;
        if let Some(enabled) = update.enabled {
            next.enabled = enabled;
        }
        if let Some(secs) = update.scan_interval_secs {
            if secs == 0 {
                return Err(PlannerError::invalid_input("scan_interval_secs")
                    .with_reason("must be at least 1 second"));
            }
            next.scan_interval_secs = secs;
        }
        if let Some(hours) = update.reminder_window_hours {
            if !(1..=MAX_REMINDER_WINDOW_HOURS).contains(&hours) {
                return Err(PlannerError::invalid_input("reminder_window_hours").with_reason(
                    format!("must be between 1 and {MAX_REMINDER_WINDOW_HOURS} hours"),
                ));
            }
            next.reminder_window_hours = hours;
        }
        if let Some(alerts) = update.alerts_enabled {
            next.alerts_enabled = alerts;
        }
        Ok(next)
    }
}

/// Partial configuration change; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfigUpdate {
    pub enabled: Option<bool>,
    pub scan_interval_secs: Option<u64>,
    pub reminder_window_hours: Option<u64>,
    pub alerts_enabled: Option<bool>,
}

impl NotificationConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
