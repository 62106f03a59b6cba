//! Notification engine: periodic scans for due dates and completions.
//!
//! A scan cycle walks every plan, asks [`scan::evaluate_plan`] which
//! notifications are missing and stores them. Each condition (a task's due
//! date, a completed milestone, a completed plan) gets at most one stored
//! notification; the unique `dedup_key` column backs this up across cycles
//! and across concurrent scanners. A plan that fails to scan is logged and
//! skipped, the rest of the cycle carries on.
//!
//! ```text
//!   start() ──▶ scan ──▶ sleep(interval) ──▶ scan ──▶ ... ──▶ stop()
//!                 │
//!                 ├─ plan 1: snapshot → evaluate → insert → alert
//!                 ├─ plan 2: (store error) → warn, continue
//!                 └─ plan 3: ...
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use waypoint_core::{notify::NotificationEngine, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().build().await?;
//! let engine = NotificationEngine::new(planner).await?;
//!
//! let report = engine.scan().await?;
//! println!("{} new notifications", report.created.len());
//!
//! engine.start()?;
//! // ... later
//! engine.stop().await;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    error::{PlannerError, Result},
    models::Notification,
    planner::Planner,
};

pub mod alert;
pub mod config;
pub mod scan;

pub use alert::{AlertSink, LogAlertSink};
pub use config::{NotificationConfig, NotificationConfigUpdate, CONFIG_KEY};
pub use scan::{evaluate_plan, Seen};

/// Outcome of one scan cycle.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Notifications stored by this cycle
    pub created: Vec<Notification>,
    /// Plans whose scan failed and were skipped
    pub failed_plans: Vec<u64>,
}

struct Inner {
    planner: Planner,
    sink: Arc<dyn AlertSink>,
    config: RwLock<NotificationConfig>,
    /// Serialises scan cycles
    scan_lock: tokio::sync::Mutex<()>,
    /// Serialises read-modify-write of the configuration
    config_lock: tokio::sync::Mutex<()>,
}

struct Worker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Owns the notification set and the scan timer.
pub struct NotificationEngine {
    inner: Arc<Inner>,
    worker: Mutex<Option<Worker>>,
}

impl Inner {
    fn config(&self) -> NotificationConfig {
        *self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    async fn scan(&self) -> Result<ScanReport> {
        let _guard = self.scan_lock.lock().await;
        let config = self.config();
        let window = config.reminder_window();
        let tz = self.planner.time_zone().clone();
        let sink = Arc::clone(&self.sink);

        let report = self
            .planner
            .run_blocking(move |db, now| {
                let plans = db.list_plans(None)?;
                let mut seen = Seen::from_notifications(&db.list_notifications()?);
                let mut report = ScanReport::default();

                for plan in plans {
                    let scanned = db.plan_snapshot(plan.id).and_then(|snapshot| {
                        let mut created = Vec::new();
                        for candidate in evaluate_plan(&snapshot, &seen, now, window, &tz) {
                            if let Some(stored) = db.insert_notification(&candidate, now)? {
                                log::debug!(
                                    "Stored {} notification {}: {}",
                                    stored.kind.as_str(),
                                    stored.id,
                                    stored.message
                                );
                                created.push(stored);
                            }
                            seen.record(&candidate);
                        }
                        Ok(created)
                    });

                    match scanned {
                        Ok(created) => report.created.extend(created),
                        Err(e) => {
                            log::warn!("Skipping plan {} in notification scan: {e}", plan.id);
                            report.failed_plans.push(plan.id);
                        }
                    }
                }

                if config.alerts_enabled {
                    for n in &report.created {
                        if let Err(e) = sink.deliver(&n.title, &n.message) {
                            log::warn!("Alert delivery failed for notification {}: {e}", n.id);
                        }
                    }
                }
                Ok(report)
            })
            .await?;

        log::info!(
            "Notification scan stored {} new notifications ({} plans skipped)",
            report.created.len(),
            report.failed_plans.len()
        );
        Ok(report)
    }

    async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        loop {
            let config = self.config();
            if config.enabled {
                if let Err(e) = self.scan().await {
                    log::error!("Notification scan failed: {e}");
                }
            } else {
                log::debug!("Notifications disabled; skipping scan");
            }

            tokio::select! {
                _ = tokio::time::sleep(config.scan_interval()) => {}
                _ = shutdown.changed() => break,
            }
        }
        log::debug!("Notification timer stopped");
    }
}

impl NotificationEngine {
    /// Creates an engine that delivers alerts to the log.
    ///
    /// The configuration is loaded from the store; defaults apply when none
    /// was saved and out-of-range stored values are clamped.
    pub async fn new(planner: Planner) -> Result<Self> {
        Self::with_sink(planner, Arc::new(LogAlertSink)).await
    }

    /// Creates an engine with a custom alert sink.
    pub async fn with_sink(planner: Planner, sink: Arc<dyn AlertSink>) -> Result<Self> {
        let config = planner
            .run_blocking(|db, _| db.get_setting::<NotificationConfig>(CONFIG_KEY))
            .await?
            .unwrap_or_default()
            .clamped();

        Ok(Self {
            inner: Arc::new(Inner {
                planner,
                sink,
                config: RwLock::new(config),
                scan_lock: tokio::sync::Mutex::new(()),
                config_lock: tokio::sync::Mutex::new(()),
            }),
            worker: Mutex::new(None),
        })
    }

    /// Runs one scan cycle now, whatever `enabled` says.
    ///
    /// # Errors
    ///
    /// Only when the store cannot be opened or listed at all; failures of
    /// individual plans are reported in [`ScanReport::failed_plans`].
    pub async fn scan(&self) -> Result<ScanReport> {
        self.inner.scan().await
    }

    /// Starts the timer: one scan right away, then one per interval.
    ///
    /// Returns `false` when the timer was already running.
    ///
    /// # Errors
    ///
    /// `PlannerError::Configuration` when called outside a Tokio runtime.
    pub fn start(&self) -> Result<bool> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|e| PlannerError::Configuration {
                message: format!("Notification engine needs a Tokio runtime: {e}"),
            })?;

        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if worker.as_ref().is_some_and(|w| !w.handle.is_finished()) {
            return Ok(false);
        }

        let (shutdown, receiver) = watch::channel(false);
        let handle = runtime.spawn(Arc::clone(&self.inner).run(receiver));
        *worker = Some(Worker { shutdown, handle });
        log::info!(
            "Notification timer started (every {}s)",
            self.inner.config().scan_interval_secs
        );
        Ok(true)
    }

    /// Stops the timer and waits for an in-flight scan to finish.
    pub async fn stop(&self) {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(worker) = worker {
            let _ = worker.shutdown.send(true);
            if let Err(e) = worker.handle.await {
                log::warn!("Notification timer ended abnormally: {e}");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|w| !w.handle.is_finished())
    }

    /// All notifications, newest first.
    pub async fn list(&self) -> Result<Vec<Notification>> {
        self.inner
            .planner
            .run_blocking(|db, _| db.list_notifications())
            .await
    }

    /// Unread notifications, newest first.
    pub async fn list_unread(&self) -> Result<Vec<Notification>> {
        self.inner
            .planner
            .run_blocking(|db, _| db.list_unread_notifications())
            .await
    }

    pub async fn unread_count(&self) -> Result<u64> {
        self.inner
            .planner
            .run_blocking(|db, _| db.unread_notification_count())
            .await
    }

    /// Marks a notification read. A missing id is not an error; the return
    /// value says whether anything matched.
    pub async fn mark_read(&self, id: u64) -> Result<bool> {
        self.inner
            .planner
            .run_blocking(move |db, _| db.mark_notification_read(id))
            .await
    }

    /// Marks every notification read. Returns how many were unread.
    pub async fn mark_all_read(&self) -> Result<usize> {
        self.inner
            .planner
            .run_blocking(|db, _| db.mark_all_notifications_read())
            .await
    }

    /// Deletes a notification; a missing id is a no-op.
    ///
    /// If the condition still holds, a later scan stores it again.
    pub async fn delete(&self, id: u64) -> Result<bool> {
        self.inner
            .planner
            .run_blocking(move |db, _| db.delete_notification(id))
            .await
    }

    /// Deletes every notification. Returns how many were removed.
    pub async fn clear_all(&self) -> Result<usize> {
        self.inner
            .planner
            .run_blocking(|db, _| db.clear_notifications())
            .await
    }

    /// Current configuration.
    pub fn get_config(&self) -> NotificationConfig {
        self.inner.config()
    }

    /// Applies and persists a partial configuration change.
    ///
    /// A running timer picks the new interval up after its current sleep.
    pub async fn update_config(&self, update: NotificationConfigUpdate) -> Result<NotificationConfig> {
        let _guard = self.inner.config_lock.lock().await;
        let next = self.inner.config().apply(&update)?;

        self.inner
            .planner
            .run_blocking(move |db, now| db.set_setting(CONFIG_KEY, &next, now))
            .await?;

        *self
            .inner
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;
        log::debug!("Notification config updated: {next:?}");
        Ok(next)
    }
}

impl Drop for NotificationEngine {
    fn drop(&mut self) {
        let worker = self
            .worker
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            let _ = worker.shutdown.send(true);
            worker.handle.abort();
        }
    }
}
