//! Waypoint CLI
//!
//! Command-line front end for the Waypoint planner. Logging goes to stderr
//! and is controlled with `RUST_LOG`.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use waypoint_core::{params::ListPlans, PlannerBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize planner")?;

    info!("Waypoint started with {}", planner.database_path().display());

    let cli = Cli::new(planner, TerminalRenderer::new(!no_color));
    match command {
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Milestone { command }) => cli.handle_milestone_command(command).await,
        Some(Task { command }) => cli.handle_task_command(command).await,
        Some(Resource { command }) => cli.handle_resource_command(command).await,
        Some(Dashboard) => cli.dashboard().await,
        Some(Notify { command }) => cli.handle_notify_command(command).await,
        None => cli.list_plans(&ListPlans::default()).await,
    }
}
