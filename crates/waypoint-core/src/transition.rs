//! Status transition rules for plans, milestones and tasks.
//!
//! The default [`TransitionPolicy::Permissive`] accepts any member of the
//! entity's status enum, so users can re-open completed work or correct a
//! mistaken status by hand. Embedding products that want a workflow can opt
//! into [`TransitionPolicy::Strict`]:
//!
//! ```text
//! tasks, milestones:  todo -> in_progress -> completed
//!                     todo -> completed
//!                     any non-terminal -> cancelled
//! plans:              active <-> paused
//!                     active | paused -> completed
//!                     any non-terminal -> cancelled
//! ```
//!
//! Re-asserting the current status is always accepted.
//!
//! Side effects that follow a status change live here too, so the store and
//! the planner apply them identically: [`completed_at_after`] decides the
//! task completion stamp.

use std::fmt::Debug;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlannerError, Result},
    models::{MilestoneStatus, PlanStatus, TaskStatus},
};

/// Behaviour shared by the three status enums.
pub trait Lifecycle: Copy + Eq + Debug + Send + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Database/string form of the status.
    fn as_status_str(&self) -> &'static str;

    /// Whether no further work happens in this status.
    fn is_terminal(&self) -> bool;

    /// Whether the strict workflow allows moving from `self` to `to`.
    fn strictly_allows(&self, to: Self) -> bool;

    /// Parses a status, reporting [`PlannerError::InvalidStatus`] on failure.
    fn parse_status(value: &str) -> Result<Self>;
}

impl Lifecycle for PlanStatus {
    const ENTITY: &'static str = "plan";

    fn as_status_str(&self) -> &'static str {
        self.as_str()
    }

    fn is_terminal(&self) -> bool {
        matches!(self, PlanStatus::Completed | PlanStatus::Cancelled)
    }

    fn strictly_allows(&self, to: Self) -> bool {
        use PlanStatus::*;
        matches!(
            (self, to),
            (Active, Paused) | (Paused, Active) | (Active | Paused, Completed)
        ) || (to == Cancelled && !self.is_terminal())
    }

    fn parse_status(value: &str) -> Result<Self> {
        value.parse().map_err(|_| PlannerError::InvalidStatus {
            entity: Self::ENTITY,
            value: value.to_string(),
        })
    }
}

impl Lifecycle for MilestoneStatus {
    const ENTITY: &'static str = "milestone";

    fn as_status_str(&self) -> &'static str {
        self.as_str()
    }

    fn is_terminal(&self) -> bool {
        matches!(self, MilestoneStatus::Completed | MilestoneStatus::Cancelled)
    }

    fn strictly_allows(&self, to: Self) -> bool {
        use MilestoneStatus::*;
        matches!(
            (self, to),
            (Todo, InProgress) | (Todo | InProgress, Completed)
        ) || (to == Cancelled && !self.is_terminal())
    }

    fn parse_status(value: &str) -> Result<Self> {
        value.parse().map_err(|_| PlannerError::InvalidStatus {
            entity: Self::ENTITY,
            value: value.to_string(),
        })
    }
}

impl Lifecycle for TaskStatus {
    const ENTITY: &'static str = "task";

    fn as_status_str(&self) -> &'static str {
        self.as_str()
    }

    fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }

    fn strictly_allows(&self, to: Self) -> bool {
        use TaskStatus::*;
        matches!(
            (self, to),
            (Todo, InProgress) | (Todo | InProgress, Completed)
        ) || (to == Cancelled && !self.is_terminal())
    }

    fn parse_status(value: &str) -> Result<Self> {
        value.parse().map_err(|_| PlannerError::InvalidStatus {
            entity: Self::ENTITY,
            value: value.to_string(),
        })
    }
}

/// Which status changes the engine accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any status in the enum (default)
    #[default]
    Permissive,
    /// The documented workflow only
    Strict,
}

impl TransitionPolicy {
    /// Validates a status change from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::IllegalTransition` when the strict policy is
    /// active and the workflow has no such edge. The permissive policy never
    /// fails.
    pub fn check<S: Lifecycle>(self, from: S, to: S) -> Result<()> {
        match self {
            TransitionPolicy::Permissive => Ok(()),
            TransitionPolicy::Strict if from == to || from.strictly_allows(to) => Ok(()),
            TransitionPolicy::Strict => Err(PlannerError::IllegalTransition {
                entity: S::ENTITY,
                from: from.as_status_str().to_string(),
                to: to.as_status_str().to_string(),
            }),
        }
    }
}

/// The `completed_at` value a task carries after moving to `to`.
///
/// Entering `Completed` stamps `now`; staying `Completed` keeps the original
/// stamp; every other status clears it.
pub fn completed_at_after(
    from: TaskStatus,
    to: TaskStatus,
    previous: Option<Timestamp>,
    now: Timestamp,
) -> Option<Timestamp> {
    match (from, to) {
        (TaskStatus::Completed, TaskStatus::Completed) => previous.or(Some(now)),
        (_, TaskStatus::Completed) => Some(now),
        _ => None,
    }
}
