//! Milestone model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::MilestoneStatus;

/// Ordered checkpoint within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    /// Unique identifier for the milestone
    pub id: u64,

    /// ID of the plan the milestone belongs to
    pub plan_id: u64,

    pub title: String,

    pub description: Option<String>,

    /// Date the milestone should be reached by
    pub target_date: Option<Timestamp>,

    pub status: MilestoneStatus,

    /// Position of the milestone within the plan (0-indexed, unique per plan)
    pub order: u32,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}
