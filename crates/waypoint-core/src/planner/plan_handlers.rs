//! Plan handler operations that return formatted wrapper types for the Planner.

use super::Planner;
use crate::{
    display::{PlanSummaries, Tasks},
    error::Result,
    models::{PlanFilter, PlanSummary},
    params::{ListPlans, ListTasks},
    progress::compute_progress,
};

impl Planner {
    /// Lists plans together with their progress.
    ///
    /// Each plan is read from its own snapshot, so the figures of one plan
    /// are always consistent with each other.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use waypoint_core::{params::ListPlans, PlannerBuilder};
    /// # async {
    /// let planner = PlannerBuilder::new().build().await?;
    /// let summaries = planner.list_plans_summary(&ListPlans::default()).await?;
    /// println!("{summaries}");
    /// # Result::<(), waypoint_core::PlannerError>::Ok(())
    /// # };
    /// ```
    pub async fn list_plans_summary(&self, params: &ListPlans) -> Result<PlanSummaries> {
        let filter = PlanFilter::from(params);
        let summaries = self
            .run_blocking(move |db, _| {
                db.list_plans(Some(&filter))?
                    .into_iter()
                    .map(|plan| {
                        let snapshot = db.plan_snapshot(plan.id)?;
                        let progress = compute_progress(
                            &snapshot.plan,
                            &snapshot.milestones,
                            &snapshot.tasks,
                        );
                        Ok(PlanSummary {
                            plan: snapshot.plan,
                            progress,
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .await?;
        Ok(PlanSummaries(summaries))
    }

    /// Lists tasks in a display wrapper.
    pub async fn list_tasks_display(&self, params: &ListTasks) -> Result<Tasks> {
        self.list_tasks(params).await.map(Tasks)
    }
}
