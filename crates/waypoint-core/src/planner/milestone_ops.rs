//! Milestone operations for the Planner.

use super::Planner;
use crate::{
    error::Result,
    models::{Milestone, MilestoneStatus, UpdateMilestoneRequest},
    params::{CreateMilestone, SetStatus, SwapMilestones, UpdateMilestone},
    transition::Lifecycle,
};

impl Planner {
    /// Appends a milestone to a plan.
    pub async fn add_milestone(&self, params: &CreateMilestone) -> Result<Milestone> {
        let params = params.clone();
        self.run_blocking(move |db, now| db.create_milestone(&params, now))
            .await
    }

    pub async fn get_milestone(&self, id: u64) -> Result<Option<Milestone>> {
        self.run_blocking(move |db, _| db.get_milestone(id)).await
    }

    /// Milestones of a plan in order.
    pub async fn list_milestones(&self, plan_id: u64) -> Result<Vec<Milestone>> {
        self.run_blocking(move |db, _| db.list_milestones(plan_id))
            .await
    }

    pub async fn update_milestone(&self, params: &UpdateMilestone) -> Result<Milestone> {
        let id = params.id;
        let request = UpdateMilestoneRequest::try_from(params.clone())?;
        let policy = self.policy;
        self.run_blocking(move |db, now| db.update_milestone(id, request, policy, now))
            .await
    }

    /// Moves a milestone to a new status.
    pub async fn set_milestone_status(&self, params: &SetStatus) -> Result<Milestone> {
        let status = MilestoneStatus::parse_status(&params.status)?;
        self.transition_milestone(params.id, status).await
    }

    pub async fn transition_milestone(&self, id: u64, status: MilestoneStatus) -> Result<Milestone> {
        let policy = self.policy;
        self.run_blocking(move |db, now| {
            db.update_milestone(id, UpdateMilestoneRequest::status(status), policy, now)
        })
        .await
    }

    /// Deletes a milestone; its tasks stay in the plan without a milestone.
    pub async fn delete_milestone(&self, id: u64) -> Result<Milestone> {
        self.run_blocking(move |db, now| db.delete_milestone(id, now))
            .await
    }

    /// Swaps the order of two milestones of the same plan.
    pub async fn swap_milestones(&self, params: &SwapMilestones) -> Result<(Milestone, Milestone)> {
        let (first, second) = (params.milestone1_id, params.milestone2_id);
        self.run_blocking(move |db, now| db.swap_milestones(first, second, now))
            .await
    }
}
