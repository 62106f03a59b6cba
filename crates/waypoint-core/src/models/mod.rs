//! Data models for plans, milestones, tasks and notifications.
//!
//! This module contains the core domain models of the Waypoint planning
//! engine. Display implementations for these models are located in
//! [`crate::display::models`] to keep data structures apart from presentation.
//!
//! Ownership follows the data model: a [`Plan`] owns its [`Milestone`]s,
//! [`Task`]s and [`Resource`]s (deleting the plan deletes them), while a task
//! only *refers* to its milestone.
//!
//! # Examples
//!
//! ```rust
//! use waypoint_core::models::{Task, TaskPriority, TaskStatus};
//! use jiff::Timestamp;
//!
//! let now = Timestamp::now();
//! let task = Task {
//!     id: 1,
//!     plan_id: 1,
//!     milestone_id: None,
//!     title: "Write outline".to_string(),
//!     description: None,
//!     status: TaskStatus::Todo,
//!     priority: TaskPriority::High,
//! #   estimated_hours: None,
//! #   actual_hours: None,
//!     due_date: Some(now - jiff::SignedDuration::from_hours(24)),
//!     completed_at: None,
//! #   order: 0,
//! #   created_at: now,
//! #   updated_at: now,
//! };
//! assert!(task.is_overdue(now));
//! ```

pub mod filters;
pub mod milestone;
pub mod notification;
pub mod plan;
pub mod progress;
pub mod requests;
pub mod resource;
pub mod status;
pub mod task;


pub use filters::{PlanFilter, TaskFilter};
pub use milestone::Milestone;
pub use notification::{NewNotification, Notification, NotificationKind, NotificationPriority};
pub use plan::{Plan, PlanDetails, PlanSummary};
pub use progress::{DashboardStats, PlanProgress};
pub use requests::{UpdateMilestoneRequest, UpdatePlanRequest, UpdateTaskRequest};
pub use resource::Resource;
pub use status::{MilestoneStatus, PlanStatus, TaskPriority, TaskStatus};
pub use task::{Task, TaskDependency};
