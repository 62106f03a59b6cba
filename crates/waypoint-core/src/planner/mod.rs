//! High-level planner API for plans, milestones, tasks and dependencies.
//!
//! The [`Planner`] is the entry point embedding applications use. Every call
//! opens a [`Database`] connection on the blocking thread pool, runs one
//! store operation and returns; the planner itself holds no entity state, so
//! it is cheap to clone and safe to share between tasks.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │    Database     │
//! │ (plan_handlers) │───▶│ (plan_ops,      │───▶│   (via db/)     │
//! │                 │    │  task_ops, ...) │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!    Presentation         Lifecycle rules        Data Persistence
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: configures database path, clock, time zone and transition
//!   policy
//! - [`plan_ops`]: plans, progress, dashboard and generated-plan import
//! - [`milestone_ops`]: milestones and their ordering
//! - [`task_ops`]: tasks and status changes
//! - [`dependency_ops`]: the task dependency graph
//! - [`resource_ops`]: resources attached to plans
//! - [`plan_handlers`]: display-ready wrappers used by the CLI
//!
//! # Example
//!
//! ```rust
//! use waypoint_core::{PlannerBuilder, params::{CreatePlan, CreateTask}};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("/tmp/waypoint-example.db"))
//!     .build()
//!     .await?;
//!
//! let plan = planner
//!     .create_plan(&CreatePlan {
//!         title: "Learn Rust".to_string(),
//!         goal: "Ship a CLI tool".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! planner
//!     .add_task(&CreateTask {
//!         plan_id: plan.id,
//!         title: "Read the book".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let progress = planner.plan_progress(plan.id).await?;
//! assert_eq!(progress.task_progress, 0);
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc};

use jiff::{tz::TimeZone, Timestamp};
use tokio::task;

use crate::{
    clock::Clock,
    db::Database,
    error::{PlannerError, Result},
    transition::TransitionPolicy,
};

pub mod builder;
pub mod dependency_ops;
pub mod milestone_ops;
pub mod plan_handlers;
pub mod plan_ops;
pub mod resource_ops;
pub mod task_ops;


pub use builder::PlannerBuilder;

/// Main planner interface.
#[derive(Clone)]
pub struct Planner {
    pub(crate) db_path: PathBuf,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) time_zone: TimeZone,
    pub(crate) policy: TransitionPolicy,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("db_path", &self.db_path)
            .field("time_zone", &self.time_zone.iana_name())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Planner {
    /// Path of the SQLite database backing this planner.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// The current instant according to the planner's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Time zone used for civil dates (bare due dates, "due today").
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    pub fn transition_policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Runs `op` against a fresh connection on the blocking pool.
    ///
    /// `op` receives the clock reading taken when the call was made, so all
    /// timestamps written by one operation agree.
    pub(crate) async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database, Timestamp) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        let now = self.clock.now();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db, now)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
