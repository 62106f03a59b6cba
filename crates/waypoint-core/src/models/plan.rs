//! Plan model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Milestone, PlanProgress, PlanStatus, Resource, Task, TaskDependency};

/// Top-level goal container owning milestones, tasks and resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: u64,

    /// Title of the plan
    pub title: String,

    /// Detailed multi-line description of the plan
    pub description: Option<String>,

    /// The goal the plan works toward
    pub goal: String,

    /// Free-form timeframe ("3 months", "Q2"); `None` means unconstrained
    pub timeframe: Option<String>,

    /// Lifecycle status of the plan
    #[serde(default)]
    pub status: PlanStatus,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,
}

/// A plan together with everything it owns, read from one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDetails {
    pub plan: Plan,
    pub milestones: Vec<Milestone>,
    pub tasks: Vec<Task>,
    pub dependencies: Vec<TaskDependency>,
    pub resources: Vec<Resource>,
    pub progress: PlanProgress,
}

/// A plan with its progress figures, as shown in plan listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    #[serde(flatten)]
    pub plan: Plan,
    pub progress: PlanProgress,
}
