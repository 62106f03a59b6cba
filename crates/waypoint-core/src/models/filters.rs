//! Filter types for querying plans and tasks.

use super::{PlanStatus, TaskPriority, TaskStatus};

/// Filter options for querying plans.
#[derive(Debug, Clone, Default)]
pub struct PlanFilter {
    /// Filter by plan title (case-insensitive partial match)
    pub title_contains: Option<String>,

    /// Filter by plan status; `None` returns every plan
    pub status: Option<PlanStatus>,
}

impl From<&crate::params::ListPlans> for PlanFilter {
    fn from(params: &crate::params::ListPlans) -> Self {
        Self {
            title_contains: params.title.clone(),
            status: params.status,
        }
    }
}

/// Filter options for querying tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub plan_id: Option<u64>,
    pub milestone_id: Option<u64>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Only tasks that have a due date
    pub has_due_date: bool,
}

impl TaskFilter {
    /// Every task of one plan.
    pub fn for_plan(plan_id: u64) -> Self {
        Self {
            plan_id: Some(plan_id),
            ..Default::default()
        }
    }
}
