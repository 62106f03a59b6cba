//! Task CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{
    milestone_queries::ensure_milestone_in_plan,
    plan_queries::{require_plan, touch_plan},
    utils::{enum_at, id_at, opt_id_at, opt_timestamp_at, timestamp_at, ts_param},
};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{Task, TaskFilter, TaskPriority, TaskStatus, UpdateTaskRequest},
    params::CreateTask,
    transition::{completed_at_after, TransitionPolicy},
};

const NEXT_TASK_ORDER_SQL: &str =
    "SELECT COALESCE(MAX(task_order), -1) + 1 FROM tasks WHERE plan_id = ?1";
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (plan_id, milestone_id, title, description, status, priority, estimated_hours, actual_hours, due_date, completed_at, task_order, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, NULL, ?9, ?10, ?11)";
const SELECT_TASK_COLUMNS: &str = "SELECT id, plan_id, milestone_id, title, description, status, priority, estimated_hours, actual_hours, due_date, completed_at, task_order, created_at, updated_at FROM tasks";
const UPDATE_TASK_SQL: &str = "UPDATE tasks SET milestone_id = ?1, title = ?2, description = ?3, status = ?4, priority = ?5, estimated_hours = ?6, actual_hours = ?7, due_date = ?8, completed_at = ?9, updated_at = ?10 WHERE id = ?11";
const DELETE_TASK_SQL: &str = "DELETE FROM tasks WHERE id = ?1";

/// Fields of a task about to be inserted. Status always starts at `todo`.
pub(crate) struct NewTask<'a> {
    pub plan_id: u64,
    pub milestone_id: Option<u64>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub priority: TaskPriority,
    pub estimated_hours: Option<f64>,
    pub due_date: Option<Timestamp>,
    pub order: u32,
}

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: id_at(row, 0)?,
        plan_id: id_at(row, 1)?,
        milestone_id: opt_id_at(row, 2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        status: enum_at(row, 5)?,
        priority: enum_at(row, 6)?,
        estimated_hours: row.get(7)?,
        actual_hours: row.get(8)?,
        due_date: opt_timestamp_at(row, 9)?,
        completed_at: opt_timestamp_at(row, 10)?,
        order: row.get::<_, i64>(11)? as u32,
        created_at: timestamp_at(row, 12)?,
        updated_at: timestamp_at(row, 13)?,
    })
}

pub(crate) fn select_task(conn: &Connection, id: u64) -> Result<Option<Task>> {
    conn.query_row(
        &format!("{SELECT_TASK_COLUMNS} WHERE id = ?1"),
        params![id as i64],
        task_from_row,
    )
    .optional()
    .db_context("Failed to query task")
}

pub(crate) fn require_task(conn: &Connection, id: u64) -> Result<Task> {
    select_task(conn, id)?.ok_or(PlannerError::not_found("Task", id))
}

pub(crate) fn select_tasks(conn: &Connection, filter: &TaskFilter) -> Result<Vec<Task>> {
    let mut query = SELECT_TASK_COLUMNS.to_string();
    let mut conditions = Vec::new();
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(plan_id) = filter.plan_id {
        conditions.push("plan_id = ?");
        params_vec.push(Box::new(plan_id as i64));
    }
    if let Some(milestone_id) = filter.milestone_id {
        conditions.push("milestone_id = ?");
        params_vec.push(Box::new(milestone_id as i64));
    }
    if let Some(status) = filter.status {
        conditions.push("status = ?");
        params_vec.push(Box::new(status.as_str()));
    }
    if let Some(priority) = filter.priority {
        conditions.push("priority = ?");
        params_vec.push(Box::new(priority.as_str()));
    }
    if filter.has_due_date {
        conditions.push("due_date IS NOT NULL");
    }

    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
    }
    query.push_str(" ORDER BY plan_id, task_order, id");

    let mut stmt = conn.prepare(&query).db_context("Failed to prepare query")?;
    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();
    let tasks = stmt
        .query_map(&params_refs[..], task_from_row)
        .db_context("Failed to query tasks")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read task rows")?;
    Ok(tasks)
}

pub(crate) fn insert_task(conn: &Connection, task: &NewTask<'_>, now: Timestamp) -> Result<Task> {
    let now_str = now.to_string();
    let description = task.description.filter(|d| !d.trim().is_empty());

    conn.execute(
        INSERT_TASK_SQL,
        params![
            task.plan_id as i64,
            task.milestone_id.map(|id| id as i64),
            task.title.trim(),
            description,
            TaskStatus::Todo.as_str(),
            task.priority.as_str(),
            task.estimated_hours,
            ts_param(task.due_date),
            task.order as i64,
            &now_str,
            &now_str
        ],
    )
    .db_context("Failed to insert task")?;

    Ok(Task {
        id: conn.last_insert_rowid() as u64,
        plan_id: task.plan_id,
        milestone_id: task.milestone_id,
        title: task.title.trim().to_string(),
        description: description.map(String::from),
        status: TaskStatus::Todo,
        priority: task.priority,
        estimated_hours: task.estimated_hours,
        actual_hours: None,
        due_date: task.due_date,
        completed_at: None,
        order: task.order,
        created_at: now,
        updated_at: now,
    })
}

impl super::Database {
    /// Adds a task at the end of a plan.
    ///
    /// # Errors
    ///
    /// * `PlannerError::NotFound` - the plan or the milestone does not exist
    /// * `PlannerError::InvalidInput` - invalid fields, or a milestone of
    ///   another plan
    pub fn create_task(&mut self, params: &CreateTask, now: Timestamp) -> Result<Task> {
        let priority = params.validate()?;

        let tx = self.write_transaction()?;

        require_plan(&tx, params.plan_id)?;
        if let Some(milestone_id) = params.milestone_id {
            ensure_milestone_in_plan(&tx, milestone_id, params.plan_id)?;
        }

        let order: i64 = tx
            .query_row(NEXT_TASK_ORDER_SQL, params![params.plan_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to get next task order")?;

        let task = insert_task(
            &tx,
            &NewTask {
                plan_id: params.plan_id,
                milestone_id: params.milestone_id,
                title: &params.title,
                description: params.description.as_deref(),
                priority,
                estimated_hours: params.estimated_hours,
                due_date: params.due_date,
                order: order as u32,
            },
            now,
        )?;
        touch_plan(&tx, params.plan_id, now)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Retrieves a task by its ID.
    pub fn get_task(&self, id: u64) -> Result<Option<Task>> {
        select_task(&self.connection, id)
    }

    /// Lists tasks matching `filter`, ordered by plan then position.
    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        select_tasks(&self.connection, filter)
    }

    /// Applies field changes to a task.
    ///
    /// A status change goes through `policy` and restamps `completed_at`
    /// so that it is set exactly when the task is completed.
    pub fn update_task(
        &mut self,
        id: u64,
        request: UpdateTaskRequest,
        policy: TransitionPolicy,
        now: Timestamp,
    ) -> Result<Task> {
        let tx = self.write_transaction()?;

        let mut task = require_task(&tx, id)?;

        if let Some(status) = request.status {
            policy.check(task.status, status)?;
            task.completed_at = completed_at_after(task.status, status, task.completed_at, now);
            task.status = status;
        }
        if let Some(milestone_id) = request.milestone_id {
            if let Some(milestone_id) = milestone_id {
                ensure_milestone_in_plan(&tx, milestone_id, task.plan_id)?;
            }
            task.milestone_id = milestone_id;
        }
        if let Some(title) = request.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            task.description = crate::params::non_blank(Some(description));
        }
        if let Some(priority) = request.priority {
            task.priority = priority;
        }
        if let Some(hours) = request.estimated_hours {
            task.estimated_hours = Some(hours);
        }
        if let Some(hours) = request.actual_hours {
            task.actual_hours = Some(hours);
        }
        if let Some(due_date) = request.due_date {
            task.due_date = due_date;
        }
        task.updated_at = now;

        tx.execute(
            UPDATE_TASK_SQL,
            params![
                task.milestone_id.map(|id| id as i64),
                &task.title,
                task.description.as_deref(),
                task.status.as_str(),
                task.priority.as_str(),
                task.estimated_hours,
                task.actual_hours,
                ts_param(task.due_date),
                ts_param(task.completed_at),
                now.to_string(),
                id as i64
            ],
        )
        .db_context("Failed to update task")?;
        touch_plan(&tx, task.plan_id, now)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Deletes a task and every dependency edge touching it. Returns the
    /// deleted task.
    pub fn delete_task(&mut self, id: u64, now: Timestamp) -> Result<Task> {
        let tx = self.write_transaction()?;

        let task = require_task(&tx, id)?;
        tx.execute(DELETE_TASK_SQL, params![id as i64])
            .db_context("Failed to delete task")?;
        touch_plan(&tx, task.plan_id, now)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }
}
