//! Task model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{TaskPriority, TaskStatus};

/// Actionable unit of work within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: u64,

    /// ID of the parent plan
    pub plan_id: u64,

    /// Optional milestone the task is grouped under (same plan)
    pub milestone_id: Option<u64>,

    /// Brief title/summary of the task
    pub title: String,

    /// Detailed multi-line description of the task
    pub description: Option<String>,

    /// Current status of the task
    pub status: TaskStatus,

    pub priority: TaskPriority,

    pub estimated_hours: Option<f64>,

    pub actual_hours: Option<f64>,

    /// When the task is due
    pub due_date: Option<Timestamp>,

    /// Set iff `status == Completed`
    pub completed_at: Option<Timestamp>,

    /// Order of the task within the plan (0-indexed)
    pub order: u32,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the task was last updated (UTC)
    pub updated_at: Timestamp,
}

impl Task {
    /// Whether the task counts toward completion.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Whether the task is past due and still not completed at `now`.
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < now)
    }
}

/// Directed edge: `dependent_id` is not actionable until `prerequisite_id`
/// is completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskDependency {
    pub id: u64,
    pub dependent_id: u64,
    pub prerequisite_id: u64,
}
