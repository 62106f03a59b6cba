//! Status and priority enumerations for plans, milestones and tasks.
//!
//! Each entity gets its own closed enum; parsing goes through
//! [`normalize_status`] so `"In Progress"`, `"in-progress"` and
//! `"IN_PROGRESS"` all resolve to the same variant.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonicalizes user-supplied status text: lowercase, `-`/space to `_`.
pub(crate) fn normalize_status(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Type-safe enumeration of plan statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Plan is being worked on
    #[default]
    Active,

    /// Plan has been finished; progress is reported as 100%
    Completed,

    /// Plan is on hold
    Paused,

    /// Plan was abandoned
    Cancelled,
}

impl PlanStatus {
    /// All variants, in declaration order.
    pub const ALL: [PlanStatus; 4] = [
        PlanStatus::Active,
        PlanStatus::Completed,
        PlanStatus::Paused,
        PlanStatus::Cancelled,
    ];

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Active => "active",
            PlanStatus::Completed => "completed",
            PlanStatus::Paused => "paused",
            PlanStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status(s).as_str() {
            "active" => Ok(PlanStatus::Active),
            "completed" | "complete" => Ok(PlanStatus::Completed),
            "paused" => Ok(PlanStatus::Paused),
            "cancelled" | "canceled" => Ok(PlanStatus::Cancelled),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

/// Type-safe enumeration of milestone statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
    Cancelled,
}

impl MilestoneStatus {
    pub const ALL: [MilestoneStatus; 4] = [
        MilestoneStatus::Todo,
        MilestoneStatus::InProgress,
        MilestoneStatus::Completed,
        MilestoneStatus::Cancelled,
    ];

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Todo => "todo",
            MilestoneStatus::InProgress => "in_progress",
            MilestoneStatus::Completed => "completed",
            MilestoneStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for MilestoneStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status(s).as_str() {
            "todo" => Ok(MilestoneStatus::Todo),
            "in_progress" | "inprogress" => Ok(MilestoneStatus::InProgress),
            "completed" | "complete" | "done" => Ok(MilestoneStatus::Completed),
            "cancelled" | "canceled" => Ok(MilestoneStatus::Cancelled),
            _ => Err(format!("Invalid milestone status: {s}")),
        }
    }
}

/// Type-safe enumeration of task statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is pending
    #[default]
    Todo,

    /// Task is being worked on
    InProgress,

    /// Task has been completed; `completed_at` is set
    Completed,

    /// Task was dropped
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waypoint_core::models::TaskStatus;
    ///
    /// assert_eq!(TaskStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(TaskStatus::InProgress.with_icon(), "➤ In Progress");
    /// assert_eq!(TaskStatus::Todo.with_icon(), "○ Todo");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            TaskStatus::Completed => "✓ Completed",
            TaskStatus::InProgress => "➤ In Progress",
            TaskStatus::Todo => "○ Todo",
            TaskStatus::Cancelled => "✗ Cancelled",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status(s).as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "completed" | "complete" | "done" => Ok(TaskStatus::Completed),
            "cancelled" | "canceled" => Ok(TaskStatus::Cancelled),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

/// Task priority, lowest to highest.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_status(s).as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" | "normal" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            _ => Err(format!("Invalid task priority: {s}")),
        }
    }
}
