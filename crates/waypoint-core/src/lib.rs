//! Core library for the Waypoint planning engine.
//!
//! Waypoint keeps plans, their milestones and tasks, the dependency edges
//! between tasks, and the notifications derived from all of that, in one
//! SQLite store. Every mutation goes through the [`Planner`], which enforces
//! the invariants: `completed_at` is set iff a task is completed, dependency
//! edges stay acyclic and within one plan, milestone orders stay unique.
//!
//! # Layers
//!
//! - [`models`]: domain types, with Display impls in [`display`]
//! - [`params`]: caller-facing parameter structs, validated into requests
//! - [`db`]: SQL storage, one query module per entity
//! - [`transition`], [`graph`], [`progress`]: pure rules (status changes,
//!   cycle detection, completion figures)
//! - [`planner`]: async facade running store work on blocking threads
//! - [`notify`]: the notification engine and its scan timer
//! - [`generate`]: import of externally generated plans
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use waypoint_core::{
//!     params::{CreatePlan, CreateTask, ListPlans},
//!     PlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("plans.db"))
//!     .build()
//!     .await?;
//!
//! let plan = planner
//!     .create_plan(&CreatePlan {
//!         title: "Learn Rust".to_string(),
//!         goal: "Ship a small CLI".to_string(),
//!         timeframe: Some("3 months".to_string()),
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
//! for summary in &planner.list_plans_summary(&ListPlans::default()).await? {
//!     println!("{}: {}%", summary.plan.title, summary.progress.overall_progress);
//! }
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod db;
pub mod display;
pub mod error;
pub mod generate;
pub mod graph;
pub mod models;
pub mod notify;
pub mod params;
pub mod planner;
pub mod progress;
pub mod transition;

pub use clock::{Clock, FixedClock, SystemClock};
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, LocalDateTime, Notifications, OperationStatus, PlanSummaries,
    Tasks, UpdateResult,
};
pub use error::{PlannerError, Result};
pub use models::{
    DashboardStats, Milestone, MilestoneStatus, Notification, NotificationKind,
    NotificationPriority, Plan, PlanDetails, PlanProgress, PlanStatus, PlanSummary, Resource,
    Task, TaskDependency, TaskPriority, TaskStatus,
};
pub use notify::{NotificationConfig, NotificationConfigUpdate, NotificationEngine, ScanReport};
pub use planner::{Planner, PlannerBuilder};
pub use transition::TransitionPolicy;
