//! External alert delivery.
//!
//! The engine hands every newly stored notification to an [`AlertSink`]
//! (desktop popup, chat webhook, ...). Delivery is fire-and-forget: a failing
//! sink is logged and never affects the stored notification.

use crate::error::Result;

/// Capability for pushing an alert outside the process.
pub trait AlertSink: Send + Sync {
    fn deliver(&self, title: &str, message: &str) -> Result<()>;
}

/// Writes alerts to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn deliver(&self, title: &str, message: &str) -> Result<()> {
        log::info!("{title}: {message}");
        Ok(())
    }
}
