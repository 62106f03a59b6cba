//! Notification persistence.
//!
//! Every notification carries a `dedup_key` naming the condition it reports
//! (see [`NewNotification::dedup_key`]). The column is UNIQUE and inserts use
//! `INSERT OR IGNORE`, so a condition that already has a stored notification
//! is never stored twice, even when two scans race.

use jiff::Timestamp;
use rusqlite::{params, Row};

use super::utils::{enum_at, id_at, opt_id_at, opt_timestamp_at, timestamp_at, ts_param};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{NewNotification, Notification},
};

const INSERT_NOTIFICATION_SQL: &str = "INSERT OR IGNORE INTO notifications (type, title, message, task_id, plan_id, milestone_id, due_date, created_at, is_read, priority, dedup_key) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, ?10)";
const SELECT_NOTIFICATION_COLUMNS: &str = "SELECT id, type, title, message, task_id, plan_id, milestone_id, due_date, created_at, is_read, priority FROM notifications";
const COUNT_UNREAD_SQL: &str = "SELECT COUNT(*) FROM notifications WHERE is_read = 0";
const MARK_READ_SQL: &str = "UPDATE notifications SET is_read = 1 WHERE id = ?1";
const MARK_ALL_READ_SQL: &str = "UPDATE notifications SET is_read = 1 WHERE is_read = 0";
const DELETE_NOTIFICATION_SQL: &str = "DELETE FROM notifications WHERE id = ?1";
const CLEAR_NOTIFICATIONS_SQL: &str = "DELETE FROM notifications";

fn notification_from_row(row: &Row) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: id_at(row, 0)?,
        kind: enum_at(row, 1)?,
        title: row.get(2)?,
        message: row.get(3)?,
        task_id: opt_id_at(row, 4)?,
        plan_id: opt_id_at(row, 5)?,
        milestone_id: opt_id_at(row, 6)?,
        due_date: opt_timestamp_at(row, 7)?,
        created_at: timestamp_at(row, 8)?,
        is_read: row.get::<_, i64>(9)? != 0,
        priority: enum_at(row, 10)?,
    })
}

impl super::Database {
    /// Stores a notification unless one for the same condition exists.
    ///
    /// Returns the stored notification, or `None` when it was a duplicate.
    pub fn insert_notification(
        &mut self,
        notification: &NewNotification,
        now: Timestamp,
    ) -> Result<Option<Notification>> {
        let inserted = self
            .connection
            .execute(
                INSERT_NOTIFICATION_SQL,
                params![
                    notification.kind.as_str(),
                    &notification.title,
                    &notification.message,
                    notification.task_id.map(|id| id as i64),
                    notification.plan_id.map(|id| id as i64),
                    notification.milestone_id.map(|id| id as i64),
                    ts_param(notification.due_date),
                    now.to_string(),
                    notification.priority.as_str(),
                    notification.dedup_key()
                ],
            )
            .db_context("Failed to insert notification")?;

        if inserted == 0 {
            return Ok(None);
        }

        Ok(Some(Notification {
            id: self.connection.last_insert_rowid() as u64,
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            task_id: notification.task_id,
            plan_id: notification.plan_id,
            milestone_id: notification.milestone_id,
            due_date: notification.due_date,
            created_at: now,
            is_read: false,
            priority: notification.priority,
        }))
    }

    fn query_notifications(&self, unread_only: bool) -> Result<Vec<Notification>> {
        let query = if unread_only {
            format!("{SELECT_NOTIFICATION_COLUMNS} WHERE is_read = 0 ORDER BY id DESC")
        } else {
            format!("{SELECT_NOTIFICATION_COLUMNS} ORDER BY id DESC")
        };
        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let notifications = stmt
            .query_map([], notification_from_row)
            .db_context("Failed to query notifications")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read notification rows")?;
        Ok(notifications)
    }

    /// All notifications, newest first.
    pub fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.query_notifications(false)
    }

    /// Unread notifications, newest first.
    pub fn list_unread_notifications(&self) -> Result<Vec<Notification>> {
        self.query_notifications(true)
    }

    pub fn unread_notification_count(&self) -> Result<u64> {
        let count: i64 = self
            .connection
            .query_row(COUNT_UNREAD_SQL, [], |row| row.get(0))
            .db_context("Failed to count unread notifications")?;
        Ok(count as u64)
    }

    /// Marks one notification read. Returns whether it existed.
    pub fn mark_notification_read(&mut self, id: u64) -> Result<bool> {
        let changed = self
            .connection
            .execute(MARK_READ_SQL, params![id as i64])
            .db_context("Failed to mark notification read")?;
        Ok(changed > 0)
    }

    /// Marks every notification read. Returns how many were unread.
    pub fn mark_all_notifications_read(&mut self) -> Result<usize> {
        self.connection
            .execute(MARK_ALL_READ_SQL, [])
            .db_context("Failed to mark notifications read")
    }

    /// Deletes one notification. Returns whether it existed.
    pub fn delete_notification(&mut self, id: u64) -> Result<bool> {
        let deleted = self
            .connection
            .execute(DELETE_NOTIFICATION_SQL, params![id as i64])
            .db_context("Failed to delete notification")?;
        Ok(deleted > 0)
    }

    /// Deletes every notification. Returns how many were removed.
    pub fn clear_notifications(&mut self) -> Result<usize> {
        self.connection
            .execute(CLEAR_NOTIFICATIONS_SQL, [])
            .db_context("Failed to clear notifications")
    }
}
