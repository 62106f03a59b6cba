//! Parameter structures for Waypoint operations
//!
//! This module contains shared parameter structures that can be used across
//! different interfaces (CLI, embedding applications, generated plans) without
//! framework-specific derives. Statuses and priorities arrive here as plain
//! strings and are validated on the way into the [`crate::models`] request
//! types, so every entry point goes through the same checks.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │ Validated       │
//! │  (clap derives) │───▶│ (strings, opts) │───▶│ Requests/Models │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! The free functions at the bottom ([`validate_title`], [`parse_priority`],
//! [`parse_due_date`], ...) are the single validation path used by manual
//! creation and by [`crate::generate`] imports alike.

use jiff::{civil::Date, tz::TimeZone, Timestamp};
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlannerError, Result},
    models::{PlanStatus, TaskFilter, TaskPriority, TaskStatus},
    transition::Lifecycle,
};

/// Parameters for creating a new plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlan {
    /// Title of the plan (required)
    pub title: String,
    /// Optional detailed description of the plan
    pub description: Option<String>,
    /// Goal the plan works toward (required)
    pub goal: String,
    /// Optional timeframe; blank means no constraint
    pub timeframe: Option<String>,
}

impl CreatePlan {
    /// Checks required fields.
    pub fn validate(&self) -> Result<()> {
        validate_title("title", &self.title)?;
        validate_title("goal", &self.goal)
    }
}

/// Parameters for listing plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPlans {
    /// Only plans with this status
    pub status: Option<PlanStatus>,
    /// Only plans whose title contains this text
    pub title: Option<String>,
}

/// Parameters for updating plan fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub id: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub timeframe: Option<String>,
    /// New status (active, completed, paused, cancelled)
    pub status: Option<String>,
}

/// Parameters for a bare status change on any entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetStatus {
    pub id: u64,
    pub status: String,
}

/// Parameters for creating a milestone at the end of a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMilestone {
    pub plan_id: u64,
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<Timestamp>,
}

impl CreateMilestone {
    pub fn validate(&self) -> Result<()> {
        validate_title("title", &self.title)
    }
}

/// Parameters for updating milestone fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMilestone {
    pub id: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<Timestamp>,
    /// Remove the target date
    #[serde(default)]
    pub clear_target_date: bool,
    pub status: Option<String>,
}

/// Parameters for swapping the order of two milestones.
///
/// Both milestones must belong to the same plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwapMilestones {
    pub milestone1_id: u64,
    pub milestone2_id: u64,
}

/// Parameters for creating a task at the end of a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    pub plan_id: u64,
    /// Milestone of the same plan to group the task under
    pub milestone_id: Option<u64>,
    pub title: String,
    pub description: Option<String>,
    /// low, medium (default), high, urgent
    pub priority: Option<String>,
    pub estimated_hours: Option<f64>,
    pub due_date: Option<Timestamp>,
}

impl CreateTask {
    /// Checks fields and returns the parsed priority.
    pub fn validate(&self) -> Result<TaskPriority> {
        validate_title("title", &self.title)?;
        validate_hours("estimated_hours", self.estimated_hours)?;
        self.priority
            .as_deref()
            .map(parse_priority)
            .transpose()
            .map(Option::unwrap_or_default)
    }
}

/// Parameters for updating task fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub id: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    /// New status (todo, in_progress, completed, cancelled)
    pub status: Option<String>,
    pub priority: Option<String>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub due_date: Option<Timestamp>,
    /// Remove the due date
    #[serde(default)]
    pub clear_due_date: bool,
    pub milestone_id: Option<u64>,
    /// Detach the task from its milestone
    #[serde(default)]
    pub clear_milestone: bool,
}

/// Parameters for listing tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTasks {
    pub plan_id: Option<u64>,
    pub milestone_id: Option<u64>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl TryFrom<&ListTasks> for TaskFilter {
    type Error = PlannerError;

    fn try_from(params: &ListTasks) -> Result<Self> {
        Ok(Self {
            plan_id: params.plan_id,
            milestone_id: params.milestone_id,
            status: params
                .status
                .as_deref()
                .map(TaskStatus::parse_status)
                .transpose()?,
            priority: params.priority.as_deref().map(parse_priority).transpose()?,
            has_due_date: false,
        })
    }
}

/// Parameters naming one dependency edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dependency {
    /// Task that waits
    pub dependent_id: u64,
    /// Task that must be completed first
    pub prerequisite_id: u64,
}

/// Parameters for attaching a resource to a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateResource {
    pub plan_id: u64,
    pub title: String,
    pub url: Option<String>,
    pub kind: Option<String>,
}

impl CreateResource {
    pub fn validate(&self) -> Result<()> {
        validate_title("title", &self.title)
    }
}

/// Rejects empty or whitespace-only text for a required field.
pub fn validate_title(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlannerError::invalid_input(field).with_reason("must not be empty"));
    }
    Ok(())
}

/// Rejects negative or non-finite hour figures.
pub fn validate_hours(field: &str, hours: Option<f64>) -> Result<()> {
    match hours {
        Some(h) if !h.is_finite() || h < 0.0 => Err(PlannerError::invalid_input(field)
            .with_reason(format!("must be a non-negative number, got {h}"))),
        _ => Ok(()),
    }
}

/// Parses a task priority.
pub fn parse_priority(value: &str) -> Result<TaskPriority> {
    value
        .parse()
        .map_err(|reason: String| PlannerError::invalid_input("priority").with_reason(reason))
}

/// Maps blank optional text to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a due date given either as an RFC 3339 timestamp or a civil date.
///
/// A bare date (`2026-05-01`) means the end of that day in `tz`, so a task
/// due "today" is not overdue until the day is over.
pub fn parse_due_date(value: &str, tz: &TimeZone) -> Result<Timestamp> {
    let value = value.trim();
    if let Ok(ts) = value.parse::<Timestamp>() {
        return Ok(ts);
    }
    let date: Date = value.parse().map_err(|_| {
        PlannerError::invalid_input("due_date")
            .with_reason(format!("'{value}' is neither a date (YYYY-MM-DD) nor a timestamp"))
    })?;
    date.at(23, 59, 59, 0)
        .to_zoned(tz.clone())
        .map(|zdt| zdt.timestamp())
        .map_err(|e| PlannerError::invalid_input("due_date").with_reason(e.to_string()))
}
