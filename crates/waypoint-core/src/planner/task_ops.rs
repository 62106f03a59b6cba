//! Task operations for the Planner.

use super::Planner;
use crate::{
    error::Result,
    models::{Task, TaskFilter, TaskStatus, UpdateTaskRequest},
    params::{CreateTask, ListTasks, SetStatus, UpdateTask},
    transition::Lifecycle,
};

impl Planner {
    /// Adds a task at the end of a plan.
    ///
    /// A milestone, when given, must belong to the same plan.
    pub async fn add_task(&self, params: &CreateTask) -> Result<Task> {
        let params = params.clone();
        let task = self
            .run_blocking(move |db, now| db.create_task(&params, now))
            .await?;
        log::debug!("Added task {} to plan {}", task.id, task.plan_id);
        Ok(task)
    }

    pub async fn get_task(&self, id: u64) -> Result<Option<Task>> {
        self.run_blocking(move |db, _| db.get_task(id)).await
    }

    /// Lists tasks matching the given parameters.
    pub async fn list_tasks(&self, params: &ListTasks) -> Result<Vec<Task>> {
        let filter = TaskFilter::try_from(params)?;
        self.run_blocking(move |db, _| db.list_tasks(&filter)).await
    }

    /// Updates task fields. A status in the update follows the same rules
    /// as [`Planner::set_task_status`].
    pub async fn update_task(&self, params: &UpdateTask) -> Result<Task> {
        let id = params.id;
        let request = UpdateTaskRequest::try_from(params.clone())?;
        let policy = self.policy;
        self.run_blocking(move |db, now| db.update_task(id, request, policy, now))
            .await
    }

    /// Moves a task to a new status.
    ///
    /// Entering `completed` stamps `completed_at`; any other status clears it.
    pub async fn set_task_status(&self, params: &SetStatus) -> Result<Task> {
        let status = TaskStatus::parse_status(&params.status)?;
        self.transition_task(params.id, status).await
    }

    /// Typed variant of [`Planner::set_task_status`].
    pub async fn transition_task(&self, id: u64, status: TaskStatus) -> Result<Task> {
        let policy = self.policy;
        let task = self
            .run_blocking(move |db, now| {
                db.update_task(id, UpdateTaskRequest::status(status), policy, now)
            })
            .await?;
        log::debug!("Task {id} is now {}", task.status.as_str());
        Ok(task)
    }

    /// Deletes a task and its dependency edges. Returns the deleted task.
    pub async fn delete_task(&self, id: u64) -> Result<Task> {
        self.run_blocking(move |db, now| db.delete_task(id, now))
            .await
    }
}
