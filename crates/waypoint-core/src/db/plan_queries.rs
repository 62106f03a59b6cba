//! Plan CRUD operations and snapshot queries.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{
    dependency_queries::select_plan_dependencies,
    milestone_queries::{insert_milestone, select_milestones},
    resource_queries::select_resources,
    task_queries::{insert_task, select_tasks, NewTask},
    utils::{enum_at, id_at, timestamp_at},
};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    generate::PlanTree,
    models::{
        Milestone, Plan, PlanFilter, PlanStatus, Resource, Task, TaskDependency, TaskFilter,
        UpdatePlanRequest,
    },
    params::CreatePlan,
    transition::TransitionPolicy,
};

const INSERT_PLAN_SQL: &str = "INSERT INTO plans (title, description, goal, timeframe, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const SELECT_PLAN_SQL: &str = "SELECT id, title, description, goal, timeframe, status, created_at, updated_at FROM plans WHERE id = ?1";
const SELECT_PLANS_SQL: &str = "SELECT id, title, description, goal, timeframe, status, created_at, updated_at FROM plans";
const UPDATE_PLAN_SQL: &str = "UPDATE plans SET title = ?1, description = ?2, goal = ?3, timeframe = ?4, status = ?5, updated_at = ?6 WHERE id = ?7";
const TOUCH_PLAN_SQL: &str = "UPDATE plans SET updated_at = ?1 WHERE id = ?2";
const DELETE_PLAN_DEPENDENCIES_SQL: &str = "DELETE FROM task_dependencies WHERE dependent_id IN (SELECT id FROM tasks WHERE plan_id = ?1)";
const DELETE_PLAN_TASKS_SQL: &str = "DELETE FROM tasks WHERE plan_id = ?1";
const DELETE_PLAN_MILESTONES_SQL: &str = "DELETE FROM milestones WHERE plan_id = ?1";
const DELETE_PLAN_RESOURCES_SQL: &str = "DELETE FROM resources WHERE plan_id = ?1";
const DELETE_PLAN_SQL: &str = "DELETE FROM plans WHERE id = ?1";

/// Everything a plan owns, read inside one transaction.
#[derive(Debug, Clone)]
pub struct PlanSnapshot {
    pub plan: Plan,
    pub milestones: Vec<Milestone>,
    pub tasks: Vec<Task>,
    pub dependencies: Vec<TaskDependency>,
    pub resources: Vec<Resource>,
}

fn plan_from_row(row: &Row) -> rusqlite::Result<Plan> {
    Ok(Plan {
        id: id_at(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        goal: row.get(3)?,
        timeframe: row.get(4)?,
        status: enum_at(row, 5)?,
        created_at: timestamp_at(row, 6)?,
        updated_at: timestamp_at(row, 7)?,
    })
}

pub(crate) fn select_plan(conn: &Connection, id: u64) -> Result<Option<Plan>> {
    conn.query_row(SELECT_PLAN_SQL, params![id as i64], plan_from_row)
        .optional()
        .db_context("Failed to query plan")
}

/// Like [`select_plan`] but absent plans are an error.
pub(crate) fn require_plan(conn: &Connection, id: u64) -> Result<Plan> {
    select_plan(conn, id)?.ok_or(PlannerError::not_found("Plan", id))
}

/// Bumps a plan's `updated_at` after a change to one of its children.
pub(crate) fn touch_plan(conn: &Connection, plan_id: u64, now: Timestamp) -> Result<()> {
    conn.execute(TOUCH_PLAN_SQL, params![now.to_string(), plan_id as i64])
        .db_context("Failed to update plan timestamp")?;
    Ok(())
}

fn insert_plan(conn: &Connection, params: &CreatePlan, now: Timestamp) -> Result<Plan> {
    let now_str = now.to_string();
    let timeframe = crate::params::non_blank(params.timeframe.clone());

    conn.execute(
        INSERT_PLAN_SQL,
        params![
            params.title.trim(),
            params.description.as_deref(),
            params.goal.trim(),
            timeframe.as_deref(),
            PlanStatus::Active.as_str(),
            &now_str,
            &now_str
        ],
    )
    .db_context("Failed to insert plan")?;

    Ok(Plan {
        id: conn.last_insert_rowid() as u64,
        title: params.title.trim().to_string(),
        description: params.description.clone(),
        goal: params.goal.trim().to_string(),
        timeframe,
        status: PlanStatus::Active,
        created_at: now,
        updated_at: now,
    })
}

fn select_plans(conn: &Connection, filter: Option<&PlanFilter>) -> Result<Vec<Plan>> {
    let mut query = SELECT_PLANS_SQL.to_string();
    let mut conditions = Vec::new();
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(f) = filter {
        if let Some(ref title) = f.title_contains {
            conditions.push("title LIKE ?");
            params_vec.push(Box::new(format!("%{title}%")));
        }
        if let Some(status) = f.status {
            conditions.push("status = ?");
            params_vec.push(Box::new(status.as_str()));
        }
    }

    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
    }
    query.push_str(" ORDER BY id DESC");

    let mut stmt = conn.prepare(&query).db_context("Failed to prepare query")?;
    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();
    let plans = stmt
        .query_map(&params_refs[..], plan_from_row)
        .db_context("Failed to query plans")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read plan rows")?;
    Ok(plans)
}

impl super::Database {
    /// Creates a new plan in the `active` status.
    pub fn create_plan(&mut self, params: &CreatePlan, now: Timestamp) -> Result<Plan> {
        params.validate()?;
        let tx = self.write_transaction()?;
        let plan = insert_plan(&tx, params, now)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(plan)
    }

    /// Retrieves a plan by its ID.
    pub fn get_plan(&self, id: u64) -> Result<Option<Plan>> {
        select_plan(&self.connection, id)
    }

    /// Lists plans, newest first, with optional filtering.
    pub fn list_plans(&self, filter: Option<&PlanFilter>) -> Result<Vec<Plan>> {
        select_plans(&self.connection, filter)
    }

    /// Applies field changes to a plan, routing any status change through
    /// `policy`.
    pub fn update_plan(
        &mut self,
        id: u64,
        request: UpdatePlanRequest,
        policy: TransitionPolicy,
        now: Timestamp,
    ) -> Result<Plan> {
        let tx = self.write_transaction()?;

        let mut plan = require_plan(&tx, id)?;
        if let Some(status) = request.status {
            policy.check(plan.status, status)?;
            plan.status = status;
        }
        if let Some(title) = request.title {
            plan.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            plan.description = crate::params::non_blank(Some(description));
        }
        if let Some(goal) = request.goal {
            plan.goal = goal.trim().to_string();
        }
        if let Some(timeframe) = request.timeframe {
            plan.timeframe = crate::params::non_blank(Some(timeframe));
        }
        plan.updated_at = now;

        tx.execute(
            UPDATE_PLAN_SQL,
            params![
                &plan.title,
                plan.description.as_deref(),
                &plan.goal,
                plan.timeframe.as_deref(),
                plan.status.as_str(),
                now.to_string(),
                id as i64
            ],
        )
        .db_context("Failed to update plan")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(plan)
    }

    /// Permanently deletes a plan together with its milestones, tasks,
    /// dependencies and resources. Returns the deleted plan.
    pub fn delete_plan(&mut self, id: u64) -> Result<Plan> {
        let tx = self.write_transaction()?;

        let plan = require_plan(&tx, id)?;

        // Foreign keys cascade as well; the explicit deletes keep the order
        // obvious and work on connections without foreign key enforcement.
        for (sql, what) in [
            (DELETE_PLAN_DEPENDENCIES_SQL, "Failed to delete plan dependencies"),
            (DELETE_PLAN_TASKS_SQL, "Failed to delete plan tasks"),
            (DELETE_PLAN_MILESTONES_SQL, "Failed to delete plan milestones"),
            (DELETE_PLAN_RESOURCES_SQL, "Failed to delete plan resources"),
            (DELETE_PLAN_SQL, "Failed to delete plan"),
        ] {
            tx.execute(sql, params![id as i64]).db_context(what)?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(plan)
    }

    /// Reads a plan and everything it owns from one consistent snapshot.
    pub fn plan_snapshot(&mut self, id: u64) -> Result<PlanSnapshot> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let plan = require_plan(&tx, id)?;
        let snapshot = PlanSnapshot {
            milestones: select_milestones(&tx, id)?,
            tasks: select_tasks(&tx, &TaskFilter::for_plan(id))?,
            dependencies: select_plan_dependencies(&tx, id)?,
            resources: select_resources(&tx, id)?,
            plan,
        };

        tx.commit().db_context("Failed to end read transaction")?;
        Ok(snapshot)
    }

    /// Reads every plan and every task from one consistent snapshot.
    pub fn dashboard_snapshot(&mut self) -> Result<(Vec<Plan>, Vec<Task>)> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        let plans = select_plans(&tx, None)?;
        let tasks = select_tasks(&tx, &TaskFilter::default())?;
        tx.commit().db_context("Failed to end read transaction")?;
        Ok((plans, tasks))
    }

    /// Inserts a validated plan tree (plan, milestones, tasks) atomically.
    pub fn insert_plan_tree(&mut self, tree: &PlanTree, now: Timestamp) -> Result<Plan> {
        let tx = self.write_transaction()?;

        let plan = insert_plan(&tx, &tree.plan, now)?;

        let mut milestone_ids = Vec::with_capacity(tree.milestones.len());
        for (order, milestone) in tree.milestones.iter().enumerate() {
            let created = insert_milestone(
                &tx,
                plan.id,
                &milestone.title,
                milestone.description.as_deref(),
                milestone.target_date,
                order as u32,
                now,
            )?;
            milestone_ids.push(created.id);
        }

        for (order, task) in tree.tasks.iter().enumerate() {
            insert_task(
                &tx,
                &NewTask {
                    plan_id: plan.id,
                    milestone_id: task
                        .milestone_index
                        .and_then(|idx| milestone_ids.get(idx).copied()),
                    title: &task.title,
                    description: task.description.as_deref(),
                    priority: task.priority,
                    estimated_hours: task.estimated_hours,
                    due_date: task.due_date,
                    order: order as u32,
                },
                now,
            )?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(plan)
    }
}
