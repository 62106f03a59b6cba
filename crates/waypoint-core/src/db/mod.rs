//! SQLite-backed entity store for plans, milestones, tasks and notifications.
//!
//! This module is the entity store adapter: create/get/list/update/delete per
//! entity type, with ownership cascades and the transactional checks that
//! must happen next to the data (dependency cycles, milestone ownership,
//! notification de-duplication). Each submodule covers one entity type.

use std::{path::Path, time::Duration};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::{DatabaseResultExt, Result};

pub mod dependency_queries;
pub mod migrations;
pub mod milestone_queries;
pub mod notification_queries;
pub mod plan_queries;
pub mod resource_queries;
pub mod settings_queries;
pub mod task_queries;
pub mod utils;

/// How long a statement waits on a locked database before giving up with
/// `StoreUnavailable`.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Begins a transaction that holds the write lock from its first
    /// statement. Every read-then-write operation goes through this.
    pub(crate) fn write_transaction(&mut self) -> Result<Transaction<'_>> {
        self.connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")
    }
}
