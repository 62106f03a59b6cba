//! Plan operations for the Planner.

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    generate::{GeneratedPlan, PlanGenerator},
    models::{
        DashboardStats, Plan, PlanDetails, PlanFilter, PlanProgress, PlanStatus, UpdatePlanRequest,
    },
    params::{CreatePlan, SetStatus, UpdatePlan},
    progress::{compute_dashboard, compute_progress},
    transition::Lifecycle,
};

impl Planner {
    /// Creates a new plan in the `active` status.
    pub async fn create_plan(&self, params: &CreatePlan) -> Result<Plan> {
        let params = params.clone();
        let plan = self
            .run_blocking(move |db, now| db.create_plan(&params, now))
            .await?;
        log::info!("Created plan {} \"{}\"", plan.id, plan.title);
        Ok(plan)
    }

    /// Retrieves a plan by its ID.
    pub async fn get_plan(&self, id: u64) -> Result<Option<Plan>> {
        self.run_blocking(move |db, _| db.get_plan(id)).await
    }

    /// Lists plans, newest first, with optional filtering.
    pub async fn list_plans(&self, filter: Option<PlanFilter>) -> Result<Vec<Plan>> {
        self.run_blocking(move |db, _| db.list_plans(filter.as_ref()))
            .await
    }

    /// Updates plan fields and, optionally, its status.
    pub async fn update_plan(&self, params: &UpdatePlan) -> Result<Plan> {
        let id = params.id;
        let request = UpdatePlanRequest::try_from(params.clone())?;
        let policy = self.policy;
        self.run_blocking(move |db, now| db.update_plan(id, request, policy, now))
            .await
    }

    /// Moves a plan to a new status.
    ///
    /// Completing a plan makes its progress report 100% whatever the state
    /// of its tasks.
    pub async fn set_plan_status(&self, params: &SetStatus) -> Result<Plan> {
        let status = PlanStatus::parse_status(&params.status)?;
        self.transition_plan(params.id, status).await
    }

    /// Typed variant of [`Planner::set_plan_status`].
    pub async fn transition_plan(&self, id: u64, status: PlanStatus) -> Result<Plan> {
        let policy = self.policy;
        let plan = self
            .run_blocking(move |db, now| {
                db.update_plan(id, UpdatePlanRequest::status(status), policy, now)
            })
            .await?;
        log::debug!("Plan {id} is now {}", plan.status.as_str());
        Ok(plan)
    }

    /// Permanently deletes a plan with all its milestones, tasks,
    /// dependencies and resources. Returns the deleted plan.
    pub async fn delete_plan(&self, id: u64) -> Result<Plan> {
        let plan = self.run_blocking(move |db, _| db.delete_plan(id)).await?;
        log::info!("Deleted plan {id} \"{}\"", plan.title);
        Ok(plan)
    }

    /// Loads a plan with everything it owns and its progress.
    pub async fn plan_details(&self, id: u64) -> Result<PlanDetails> {
        let snapshot = self.run_blocking(move |db, _| db.plan_snapshot(id)).await?;
        let progress = compute_progress(&snapshot.plan, &snapshot.milestones, &snapshot.tasks);
        Ok(PlanDetails {
            plan: snapshot.plan,
            milestones: snapshot.milestones,
            tasks: snapshot.tasks,
            dependencies: snapshot.dependencies,
            resources: snapshot.resources,
            progress,
        })
    }

    /// Completion figures of one plan, from a consistent snapshot.
    pub async fn plan_progress(&self, id: u64) -> Result<PlanProgress> {
        let snapshot = self.run_blocking(move |db, _| db.plan_snapshot(id)).await?;
        Ok(compute_progress(
            &snapshot.plan,
            &snapshot.milestones,
            &snapshot.tasks,
        ))
    }

    /// System-wide figures across every plan.
    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let (plans, tasks, now) = self
            .run_blocking(|db, now| {
                let (plans, tasks) = db.dashboard_snapshot()?;
                Ok((plans, tasks, now))
            })
            .await?;
        Ok(compute_dashboard(&plans, &tasks, now))
    }

    /// Validates a generated plan and stores it, milestones and tasks
    /// included, in one transaction. Nothing is written when validation
    /// fails.
    ///
    /// `goal` and `timeframe` fill in for fields the generator left empty.
    pub async fn import_generated_plan(
        &self,
        generated: GeneratedPlan,
        goal: &str,
        timeframe: Option<&str>,
    ) -> Result<PlanDetails> {
        let tree = generated.validate(goal, timeframe, &self.time_zone)?;
        let plan = self
            .run_blocking(move |db, now| db.insert_plan_tree(&tree, now))
            .await?;
        log::info!("Imported generated plan {} \"{}\"", plan.id, plan.title);
        self.plan_details(plan.id).await
    }

    /// Asks `generator` for a plan and imports it.
    ///
    /// # Errors
    ///
    /// Generator failures surface unchanged (usually
    /// `PlannerError::GenerationFailed`); there is no fallback plan.
    pub async fn generate_plan<G>(
        &self,
        generator: &G,
        goal: &str,
        timeframe: Option<&str>,
    ) -> Result<PlanDetails>
    where
        G: PlanGenerator + ?Sized,
    {
        if goal.trim().is_empty() {
            return Err(PlannerError::invalid_input("goal").with_reason("must not be empty"));
        }
        let generated = generator.generate(goal, timeframe)?;
        self.import_generated_plan(generated, goal, timeframe).await
    }
}
