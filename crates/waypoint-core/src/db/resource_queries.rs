//! Resource (links, references) attached to plans.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{
    plan_queries::require_plan,
    utils::{id_at, timestamp_at},
};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::Resource,
    params::{non_blank, CreateResource},
};

const INSERT_RESOURCE_SQL: &str =
    "INSERT INTO resources (plan_id, title, url, kind, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_RESOURCE_SQL: &str =
    "SELECT id, plan_id, title, url, kind, created_at FROM resources WHERE id = ?1";
const SELECT_RESOURCES_SQL: &str =
    "SELECT id, plan_id, title, url, kind, created_at FROM resources WHERE plan_id = ?1 ORDER BY id";
const DELETE_RESOURCE_SQL: &str = "DELETE FROM resources WHERE id = ?1";

fn resource_from_row(row: &Row) -> rusqlite::Result<Resource> {
    Ok(Resource {
        id: id_at(row, 0)?,
        plan_id: id_at(row, 1)?,
        title: row.get(2)?,
        url: row.get(3)?,
        kind: row.get(4)?,
        created_at: timestamp_at(row, 5)?,
    })
}

pub(crate) fn select_resources(conn: &Connection, plan_id: u64) -> Result<Vec<Resource>> {
    let mut stmt = conn
        .prepare(SELECT_RESOURCES_SQL)
        .db_context("Failed to prepare query")?;
    let resources = stmt
        .query_map(params![plan_id as i64], resource_from_row)
        .db_context("Failed to query resources")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read resource rows")?;
    Ok(resources)
}

impl super::Database {
    /// Attaches a resource to a plan.
    pub fn create_resource(&mut self, params: &CreateResource, now: Timestamp) -> Result<Resource> {
        params.validate()?;

        let tx = self.write_transaction()?;
        require_plan(&tx, params.plan_id)?;

        let url = non_blank(params.url.clone());
        let kind = non_blank(params.kind.clone());
        tx.execute(
            INSERT_RESOURCE_SQL,
            params![
                params.plan_id as i64,
                params.title.trim(),
                url.as_deref(),
                kind.as_deref(),
                now.to_string()
            ],
        )
        .db_context("Failed to insert resource")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(Resource {
            id,
            plan_id: params.plan_id,
            title: params.title.trim().to_string(),
            url,
            kind,
            created_at: now,
        })
    }

    /// Lists the resources of a plan.
    pub fn list_resources(&self, plan_id: u64) -> Result<Vec<Resource>> {
        require_plan(&self.connection, plan_id)?;
        select_resources(&self.connection, plan_id)
    }

    /// Deletes a resource and returns it.
    pub fn delete_resource(&mut self, id: u64) -> Result<Resource> {
        let tx = self.write_transaction()?;

        let resource = tx
            .query_row(SELECT_RESOURCE_SQL, params![id as i64], resource_from_row)
            .optional()
            .db_context("Failed to query resource")?
            .ok_or(PlannerError::not_found("Resource", id))?;
        tx.execute(DELETE_RESOURCE_SQL, params![id as i64])
            .db_context("Failed to delete resource")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(resource)
    }
}
