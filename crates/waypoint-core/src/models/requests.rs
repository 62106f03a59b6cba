//! Validated request types for updating models.
//!
//! These are produced from the loosely typed [`crate::params`] structures via
//! `TryFrom`, so by the time a request reaches the store every status and
//! priority is already a proper enum value.

use jiff::Timestamp;

use super::{MilestoneStatus, PlanStatus, TaskPriority, TaskStatus};
use crate::{
    error::PlannerError,
    params::{self, UpdateMilestone, UpdatePlan, UpdateTask},
    transition::Lifecycle,
};

/// Field changes for a plan. `None` leaves a field untouched.
#[derive(Debug, Default, Clone)]
pub struct UpdatePlanRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub timeframe: Option<String>,
    pub status: Option<PlanStatus>,
}

/// Field changes for a milestone.
#[derive(Debug, Default, Clone)]
pub struct UpdateMilestoneRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the target date
    pub target_date: Option<Option<Timestamp>>,
    pub status: Option<MilestoneStatus>,
}

/// Field changes for a task.
#[derive(Debug, Default, Clone)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    /// `Some(None)` clears the due date
    pub due_date: Option<Option<Timestamp>>,
    /// `Some(None)` detaches the task from its milestone
    pub milestone_id: Option<Option<u64>>,
}

impl UpdatePlanRequest {
    /// A request that only changes the status.
    pub fn status(status: PlanStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl UpdateMilestoneRequest {
    pub fn status(status: MilestoneStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl UpdateTaskRequest {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl TryFrom<UpdatePlan> for UpdatePlanRequest {
    type Error = PlannerError;

    fn try_from(params: UpdatePlan) -> Result<Self, Self::Error> {
        if let Some(title) = &params.title {
            params::validate_title("title", title)?;
        }
        if let Some(goal) = &params.goal {
            params::validate_title("goal", goal)?;
        }
        let status = params
            .status
            .as_deref()
            .map(PlanStatus::parse_status)
            .transpose()?;

        Ok(Self {
            title: params.title,
            description: params.description,
            goal: params.goal,
            timeframe: params::non_blank(params.timeframe),
            status,
        })
    }
}

impl TryFrom<UpdateMilestone> for UpdateMilestoneRequest {
    type Error = PlannerError;

    fn try_from(params: UpdateMilestone) -> Result<Self, Self::Error> {
        if let Some(title) = &params.title {
            params::validate_title("title", title)?;
        }
        let status = params
            .status
            .as_deref()
            .map(MilestoneStatus::parse_status)
            .transpose()?;
        let target_date = if params.clear_target_date {
            Some(None)
        } else {
            params.target_date.map(Some)
        };

        Ok(Self {
            title: params.title,
            description: params.description,
            target_date,
            status,
        })
    }
}

impl TryFrom<UpdateTask> for UpdateTaskRequest {
    type Error = PlannerError;

    /// Validates the loosely typed parameters.
    ///
    /// # Errors
    ///
    /// * `PlannerError::InvalidStatus` - When the status string is unknown
    /// * `PlannerError::InvalidInput` - For blank titles, unknown priorities
    ///   or negative hour figures
    fn try_from(params: UpdateTask) -> Result<Self, Self::Error> {
        if let Some(title) = &params.title {
            params::validate_title("title", title)?;
        }
        let status = params
            .status
            .as_deref()
            .map(TaskStatus::parse_status)
            .transpose()?;
        let priority = params
            .priority
            .as_deref()
            .map(params::parse_priority)
            .transpose()?;
        params::validate_hours("estimated_hours", params.estimated_hours)?;
        params::validate_hours("actual_hours", params.actual_hours)?;

        let due_date = if params.clear_due_date {
            Some(None)
        } else {
            params.due_date.map(Some)
        };
        let milestone_id = if params.clear_milestone {
            Some(None)
        } else {
            params.milestone_id.map(Some)
        };

        Ok(Self {
            title: params.title,
            description: params.description,
            status,
            priority,
            estimated_hours: params.estimated_hours,
            actual_hours: params.actual_hours,
            due_date,
            milestone_id,
        })
    }
}
