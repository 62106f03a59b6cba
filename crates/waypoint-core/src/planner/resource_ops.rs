//! Resource operations for the Planner.

use super::Planner;
use crate::{error::Result, models::Resource, params::CreateResource};

impl Planner {
    /// Attaches a resource (link, book, note) to a plan.
    pub async fn add_resource(&self, params: &CreateResource) -> Result<Resource> {
        let params = params.clone();
        self.run_blocking(move |db, now| db.create_resource(&params, now))
            .await
    }

    pub async fn list_resources(&self, plan_id: u64) -> Result<Vec<Resource>> {
        self.run_blocking(move |db, _| db.list_resources(plan_id))
            .await
    }

    pub async fn delete_resource(&self, id: u64) -> Result<Resource> {
        self.run_blocking(move |db, _| db.delete_resource(id)).await
    }
}
