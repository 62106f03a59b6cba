//! Dependency graph operations for the Planner.

use std::collections::HashMap;

use super::Planner;
use crate::{
    error::Result,
    graph::DependencyGraph,
    models::{Task, TaskDependency, TaskStatus},
    params::Dependency,
    transition::Lifecycle,
};

impl Planner {
    /// Makes `dependent_id` wait on `prerequisite_id`.
    ///
    /// The cycle check and the insert happen under one write lock; a
    /// rejected edge leaves the graph untouched.
    ///
    /// # Errors
    ///
    /// `NotFound`, `SelfDependency`, `CrossPlanDependency` or `CycleDetected`.
    pub async fn add_dependency(&self, params: &Dependency) -> Result<TaskDependency> {
        let (dependent, prerequisite) = (params.dependent_id, params.prerequisite_id);
        self.run_blocking(move |db, now| db.add_dependency(dependent, prerequisite, now))
            .await
    }

    /// Removes an edge.
    ///
    /// # Errors
    ///
    /// `PlannerError::NotFound` when the edge does not exist.
    pub async fn remove_dependency(&self, params: &Dependency) -> Result<TaskDependency> {
        let (dependent, prerequisite) = (params.dependent_id, params.prerequisite_id);
        self.run_blocking(move |db, _| db.remove_dependency(dependent, prerequisite))
            .await
    }

    /// All edges of a plan.
    pub async fn list_dependencies(&self, plan_id: u64) -> Result<Vec<TaskDependency>> {
        self.run_blocking(move |db, _| db.list_dependencies(plan_id))
            .await
    }

    /// Direct prerequisites of a task.
    pub async fn prerequisites(&self, task_id: u64) -> Result<Vec<Task>> {
        self.run_blocking(move |db, _| {
            db.prerequisites(task_id)?
                .into_iter()
                .filter_map(|edge| db.get_task(edge.prerequisite_id).transpose())
                .collect()
        })
        .await
    }

    /// Whether every prerequisite of the task is completed.
    pub async fn is_actionable(&self, task_id: u64) -> Result<bool> {
        self.run_blocking(move |db, _| db.is_actionable(task_id))
            .await
    }

    /// Open tasks of a plan whose prerequisites are all completed, with
    /// prerequisites ahead of their dependents.
    pub async fn actionable_tasks(&self, plan_id: u64) -> Result<Vec<Task>> {
        let snapshot = self
            .run_blocking(move |db, _| db.plan_snapshot(plan_id))
            .await?;

        let graph = DependencyGraph::from_edges(&snapshot.dependencies);
        let status: HashMap<u64, TaskStatus> =
            snapshot.tasks.iter().map(|t| (t.id, t.status)).collect();
        let order: Vec<u64> = snapshot.tasks.iter().map(|t| t.id).collect();
        let mut by_id: HashMap<u64, Task> =
            snapshot.tasks.into_iter().map(|t| (t.id, t)).collect();

        Ok(graph
            .topological_order(&order)
            .into_iter()
            .filter(|id| status.get(id).is_some_and(|s| !s.is_terminal()))
            .filter(|id| {
                graph
                    .prerequisites_of(*id)
                    .all(|p| status.get(&p) == Some(&TaskStatus::Completed))
            })
            .filter_map(|id| by_id.remove(&id))
            .collect())
    }
}
