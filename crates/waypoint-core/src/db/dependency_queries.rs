//! Task dependency edges.
//!
//! Inserts run in an `IMMEDIATE` transaction: the write lock is taken before
//! the edge set is read, so the cycle check and the insert see the same graph
//! even with other connections writing concurrently.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{
    plan_queries::require_plan,
    task_queries::require_task,
    utils::id_at,
};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    graph::DependencyGraph,
    models::{TaskDependency, TaskStatus},
};

const SELECT_PLAN_DEPENDENCIES_SQL: &str = "SELECT d.id, d.dependent_id, d.prerequisite_id FROM task_dependencies d JOIN tasks t ON t.id = d.dependent_id WHERE t.plan_id = ?1 ORDER BY d.id";
const SELECT_EDGE_SQL: &str = "SELECT id, dependent_id, prerequisite_id FROM task_dependencies WHERE dependent_id = ?1 AND prerequisite_id = ?2";
const SELECT_PREREQUISITES_SQL: &str = "SELECT d.id, d.dependent_id, d.prerequisite_id FROM task_dependencies d WHERE d.dependent_id = ?1 ORDER BY d.prerequisite_id";
const COUNT_OPEN_PREREQUISITES_SQL: &str = "SELECT COUNT(*) FROM task_dependencies d JOIN tasks t ON t.id = d.prerequisite_id WHERE d.dependent_id = ?1 AND t.status <> ?2";
const INSERT_DEPENDENCY_SQL: &str = "INSERT INTO task_dependencies (dependent_id, prerequisite_id, created_at) VALUES (?1, ?2, ?3)";
const DELETE_DEPENDENCY_SQL: &str = "DELETE FROM task_dependencies WHERE id = ?1";

fn dependency_from_row(row: &Row) -> rusqlite::Result<TaskDependency> {
    Ok(TaskDependency {
        id: id_at(row, 0)?,
        dependent_id: id_at(row, 1)?,
        prerequisite_id: id_at(row, 2)?,
    })
}

/// Every edge whose dependent belongs to `plan_id`.
pub(crate) fn select_plan_dependencies(
    conn: &Connection,
    plan_id: u64,
) -> Result<Vec<TaskDependency>> {
    let mut stmt = conn
        .prepare(SELECT_PLAN_DEPENDENCIES_SQL)
        .db_context("Failed to prepare query")?;
    let edges = stmt
        .query_map(params![plan_id as i64], dependency_from_row)
        .db_context("Failed to query dependencies")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read dependency rows")?;
    Ok(edges)
}

fn select_edge(
    conn: &Connection,
    dependent_id: u64,
    prerequisite_id: u64,
) -> Result<Option<TaskDependency>> {
    conn.query_row(
        SELECT_EDGE_SQL,
        params![dependent_id as i64, prerequisite_id as i64],
        dependency_from_row,
    )
    .optional()
    .db_context("Failed to query dependency")
}

impl super::Database {
    /// Records that `dependent_id` waits on `prerequisite_id`.
    ///
    /// Adding an edge that already exists returns the stored edge.
    ///
    /// # Errors
    ///
    /// * `PlannerError::NotFound` - either task is missing
    /// * `PlannerError::SelfDependency` - both ids are the same task
    /// * `PlannerError::CrossPlanDependency` - the tasks belong to different plans
    /// * `PlannerError::CycleDetected` - the prerequisite already waits on the
    ///   dependent; nothing is written
    pub fn add_dependency(
        &mut self,
        dependent_id: u64,
        prerequisite_id: u64,
        now: Timestamp,
    ) -> Result<TaskDependency> {
        let tx = self.write_transaction()?;

        let dependent = require_task(&tx, dependent_id)?;
        if dependent_id == prerequisite_id {
            return Err(PlannerError::SelfDependency {
                task_id: dependent_id,
            });
        }
        let prerequisite = require_task(&tx, prerequisite_id)?;
        if dependent.plan_id != prerequisite.plan_id {
            return Err(PlannerError::CrossPlanDependency {
                dependent_id,
                prerequisite_id,
            });
        }

        if let Some(existing) = select_edge(&tx, dependent_id, prerequisite_id)? {
            return Ok(existing);
        }

        let edges = select_plan_dependencies(&tx, dependent.plan_id)?;
        DependencyGraph::from_edges(&edges).validate_edge(dependent_id, prerequisite_id)?;

        tx.execute(
            INSERT_DEPENDENCY_SQL,
            params![dependent_id as i64, prerequisite_id as i64, now.to_string()],
        )
        .db_context("Failed to insert dependency")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;
        log::debug!("Task {dependent_id} now depends on task {prerequisite_id}");

        Ok(TaskDependency {
            id,
            dependent_id,
            prerequisite_id,
        })
    }

    /// Removes an edge. Returns the removed edge.
    pub fn remove_dependency(
        &mut self,
        dependent_id: u64,
        prerequisite_id: u64,
    ) -> Result<TaskDependency> {
        let tx = self.write_transaction()?;

        let edge = select_edge(&tx, dependent_id, prerequisite_id)?
            .ok_or(PlannerError::not_found("Dependency of task", dependent_id))?;
        tx.execute(DELETE_DEPENDENCY_SQL, params![edge.id as i64])
            .db_context("Failed to delete dependency")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(edge)
    }

    /// Lists the dependency edges of a plan.
    pub fn list_dependencies(&self, plan_id: u64) -> Result<Vec<TaskDependency>> {
        require_plan(&self.connection, plan_id)?;
        select_plan_dependencies(&self.connection, plan_id)
    }

    /// Direct prerequisite edges of a task.
    pub fn prerequisites(&self, task_id: u64) -> Result<Vec<TaskDependency>> {
        require_task(&self.connection, task_id)?;
        let mut stmt = self
            .connection
            .prepare(SELECT_PREREQUISITES_SQL)
            .db_context("Failed to prepare query")?;
        let edges = stmt
            .query_map(params![task_id as i64], dependency_from_row)
            .db_context("Failed to query prerequisites")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read dependency rows")?;
        Ok(edges)
    }

    /// Whether every prerequisite of the task is completed. Vacuously true
    /// for tasks without prerequisites.
    pub fn is_actionable(&self, task_id: u64) -> Result<bool> {
        require_task(&self.connection, task_id)?;
        let open: i64 = self
            .connection
            .query_row(
                COUNT_OPEN_PREREQUISITES_SQL,
                params![task_id as i64, TaskStatus::Completed.as_str()],
                |row| row.get(0),
            )
            .db_context("Failed to count open prerequisites")?;
        Ok(open == 0)
    }
}
