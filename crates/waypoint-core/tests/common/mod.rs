#![allow(dead_code)]

use std::sync::Arc;

use jiff::{tz::TimeZone, Timestamp};
use tempfile::TempDir;
use waypoint_core::{
    params::{CreatePlan, CreateTask},
    FixedClock, Planner, PlannerBuilder,
};

/// Instant every test clock starts at.
pub fn start() -> Timestamp {
    "2026-06-15T12:00:00Z".parse().expect("valid timestamp")
}

/// Helper function to create a test planner on a pinned UTC clock
pub async fn create_test_planner() -> (TempDir, Planner, Arc<FixedClock>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let clock = Arc::new(FixedClock::new(start()));
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_clock(clock.clone())
        .with_time_zone(TimeZone::UTC)
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner, clock)
}

pub async fn create_plan(planner: &Planner, title: &str) -> u64 {
    planner
        .create_plan(&CreatePlan {
            title: title.to_string(),
            goal: format!("Finish {title}"),
            ..Default::default()
        })
        .await
        .expect("Failed to create plan")
        .id
}

pub async fn add_task(planner: &Planner, plan_id: u64, title: &str) -> u64 {
    planner
        .add_task(&CreateTask {
            plan_id,
            title: title.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to add task")
        .id
}
