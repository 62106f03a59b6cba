//! Milestone CRUD operations and ordering.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{
    plan_queries::{require_plan, touch_plan},
    utils::{enum_at, id_at, opt_timestamp_at, timestamp_at, ts_param},
};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{Milestone, MilestoneStatus, UpdateMilestoneRequest},
    params::CreateMilestone,
    transition::TransitionPolicy,
};

const NEXT_MILESTONE_ORDER_SQL: &str =
    "SELECT COALESCE(MAX(milestone_order), -1) + 1 FROM milestones WHERE plan_id = ?1";
const INSERT_MILESTONE_SQL: &str = "INSERT INTO milestones (plan_id, title, description, target_date, status, milestone_order, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const SELECT_MILESTONE_COLUMNS: &str = "SELECT id, plan_id, title, description, target_date, status, milestone_order, created_at, updated_at FROM milestones";
const SELECT_MILESTONE_PLAN_SQL: &str = "SELECT plan_id FROM milestones WHERE id = ?1";
const UPDATE_MILESTONE_SQL: &str = "UPDATE milestones SET title = ?1, description = ?2, target_date = ?3, status = ?4, updated_at = ?5 WHERE id = ?6";
const UPDATE_MILESTONE_ORDER_TEMP_SQL: &str =
    "UPDATE milestones SET milestone_order = -1, updated_at = ?1 WHERE id = ?2";
const UPDATE_MILESTONE_ORDER_SQL: &str =
    "UPDATE milestones SET milestone_order = ?1, updated_at = ?2 WHERE id = ?3";
const DELETE_MILESTONE_SQL: &str = "DELETE FROM milestones WHERE id = ?1";

fn milestone_from_row(row: &Row) -> rusqlite::Result<Milestone> {
    Ok(Milestone {
        id: id_at(row, 0)?,
        plan_id: id_at(row, 1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        target_date: opt_timestamp_at(row, 4)?,
        status: enum_at(row, 5)?,
        order: row.get::<_, i64>(6)? as u32,
        created_at: timestamp_at(row, 7)?,
        updated_at: timestamp_at(row, 8)?,
    })
}

fn select_milestone(conn: &Connection, id: u64) -> Result<Option<Milestone>> {
    conn.query_row(
        &format!("{SELECT_MILESTONE_COLUMNS} WHERE id = ?1"),
        params![id as i64],
        milestone_from_row,
    )
    .optional()
    .db_context("Failed to query milestone")
}

fn require_milestone(conn: &Connection, id: u64) -> Result<Milestone> {
    select_milestone(conn, id)?.ok_or(PlannerError::not_found("Milestone", id))
}

/// Milestones of one plan in display order.
pub(crate) fn select_milestones(conn: &Connection, plan_id: u64) -> Result<Vec<Milestone>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_MILESTONE_COLUMNS} WHERE plan_id = ?1 ORDER BY milestone_order"
        ))
        .db_context("Failed to prepare query")?;
    let milestones = stmt
        .query_map(params![plan_id as i64], milestone_from_row)
        .db_context("Failed to query milestones")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read milestone rows")?;
    Ok(milestones)
}

/// Checks that a task in `plan_id` may reference `milestone_id`.
pub(crate) fn ensure_milestone_in_plan(
    conn: &Connection,
    milestone_id: u64,
    plan_id: u64,
) -> Result<()> {
    let owner: Option<i64> = conn
        .query_row(SELECT_MILESTONE_PLAN_SQL, params![milestone_id as i64], |row| {
            row.get(0)
        })
        .optional()
        .db_context("Failed to query milestone plan")?;

    match owner {
        None => Err(PlannerError::not_found("Milestone", milestone_id)),
        Some(owner) if owner as u64 != plan_id => Err(PlannerError::invalid_input("milestone_id")
            .with_reason(format!(
                "milestone {milestone_id} belongs to plan {owner}, not plan {plan_id}"
            ))),
        Some(_) => Ok(()),
    }
}

pub(crate) fn insert_milestone(
    conn: &Connection,
    plan_id: u64,
    title: &str,
    description: Option<&str>,
    target_date: Option<Timestamp>,
    order: u32,
    now: Timestamp,
) -> Result<Milestone> {
    let now_str = now.to_string();
    let description = description.filter(|d| !d.trim().is_empty());

    conn.execute(
        INSERT_MILESTONE_SQL,
        params![
            plan_id as i64,
            title.trim(),
            description,
            ts_param(target_date),
            MilestoneStatus::Todo.as_str(),
            order as i64,
            &now_str,
            &now_str
        ],
    )
    .db_context("Failed to insert milestone")?;

    Ok(Milestone {
        id: conn.last_insert_rowid() as u64,
        plan_id,
        title: title.trim().to_string(),
        description: description.map(String::from),
        target_date,
        status: MilestoneStatus::Todo,
        order,
        created_at: now,
        updated_at: now,
    })
}

impl super::Database {
    /// Appends a milestone to a plan.
    pub fn create_milestone(&mut self, params: &CreateMilestone, now: Timestamp) -> Result<Milestone> {
        params.validate()?;

        let tx = self.write_transaction()?;

        require_plan(&tx, params.plan_id)?;
        let order: i64 = tx
            .query_row(
                NEXT_MILESTONE_ORDER_SQL,
                params![params.plan_id as i64],
                |row| row.get(0),
            )
            .db_context("Failed to get next milestone order")?;

        let milestone = insert_milestone(
            &tx,
            params.plan_id,
            &params.title,
            params.description.as_deref(),
            params.target_date,
            order as u32,
            now,
        )?;
        touch_plan(&tx, params.plan_id, now)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(milestone)
    }

    /// Retrieves a milestone by its ID.
    pub fn get_milestone(&self, id: u64) -> Result<Option<Milestone>> {
        select_milestone(&self.connection, id)
    }

    /// Lists the milestones of a plan in order.
    pub fn list_milestones(&self, plan_id: u64) -> Result<Vec<Milestone>> {
        require_plan(&self.connection, plan_id)?;
        select_milestones(&self.connection, plan_id)
    }

    /// Applies field changes to a milestone.
    pub fn update_milestone(
        &mut self,
        id: u64,
        request: UpdateMilestoneRequest,
        policy: TransitionPolicy,
        now: Timestamp,
    ) -> Result<Milestone> {
        let tx = self.write_transaction()?;

        let mut milestone = require_milestone(&tx, id)?;
        if let Some(status) = request.status {
            policy.check(milestone.status, status)?;
            milestone.status = status;
        }
        if let Some(title) = request.title {
            milestone.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            milestone.description = crate::params::non_blank(Some(description));
        }
        if let Some(target_date) = request.target_date {
            milestone.target_date = target_date;
        }
        milestone.updated_at = now;

        tx.execute(
            UPDATE_MILESTONE_SQL,
            params![
                &milestone.title,
                milestone.description.as_deref(),
                ts_param(milestone.target_date),
                milestone.status.as_str(),
                now.to_string(),
                id as i64
            ],
        )
        .db_context("Failed to update milestone")?;
        touch_plan(&tx, milestone.plan_id, now)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(milestone)
    }

    /// Deletes a milestone. Its tasks stay in the plan, detached.
    pub fn delete_milestone(&mut self, id: u64, now: Timestamp) -> Result<Milestone> {
        let tx = self.write_transaction()?;

        let milestone = require_milestone(&tx, id)?;
        tx.execute(DELETE_MILESTONE_SQL, params![id as i64])
            .db_context("Failed to delete milestone")?;
        touch_plan(&tx, milestone.plan_id, now)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(milestone)
    }

    /// Swaps the positions of two milestones of the same plan.
    pub fn swap_milestones(
        &mut self,
        first_id: u64,
        second_id: u64,
        now: Timestamp,
    ) -> Result<(Milestone, Milestone)> {
        let tx = self.write_transaction()?;

        let mut first = require_milestone(&tx, first_id)?;
        let mut second = require_milestone(&tx, second_id)?;

        if first.plan_id != second.plan_id {
            return Err(PlannerError::invalid_input("milestone_ids").with_reason(format!(
                "milestones {first_id} and {second_id} belong to different plans"
            )));
        }

        if first_id != second_id {
            let now_str = now.to_string();
            // Park the first milestone on -1 so the UNIQUE(plan_id, order)
            // constraint holds at every step.
            tx.execute(
                UPDATE_MILESTONE_ORDER_TEMP_SQL,
                params![&now_str, first_id as i64],
            )
            .db_context("Failed to park milestone order")?;
            tx.execute(
                UPDATE_MILESTONE_ORDER_SQL,
                params![first.order as i64, &now_str, second_id as i64],
            )
            .db_context("Failed to update milestone order")?;
            tx.execute(
                UPDATE_MILESTONE_ORDER_SQL,
                params![second.order as i64, &now_str, first_id as i64],
            )
            .db_context("Failed to update milestone order")?;
            touch_plan(&tx, first.plan_id, now)?;

            std::mem::swap(&mut first.order, &mut second.order);
            first.updated_at = now;
            second.updated_at = now;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok((first, second))
    }
}
