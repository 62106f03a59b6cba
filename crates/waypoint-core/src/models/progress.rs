//! Progress figures computed from plan snapshots.

use serde::{Deserialize, Serialize};

/// Completion figures for a single plan. Percentages are 0-100.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanProgress {
    pub plan_id: u64,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub total_milestones: u32,
    pub completed_milestones: u32,
    pub task_progress: u8,
    pub milestone_progress: u8,
    pub overall_progress: u8,
}

/// System-wide figures across every plan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_plans: u32,
    pub active_plans: u32,
    pub completed_plans: u32,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub overdue_tasks: u32,
    pub overall_progress: u8,
}
