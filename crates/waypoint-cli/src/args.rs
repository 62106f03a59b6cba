//! Command-line argument definitions using clap
//!
//! Each subcommand has its own argument struct. Where a struct maps onto a
//! core parameter type it converts with `From`, so clap attributes never leak
//! into `waypoint-core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner
//! ```
//!
//! Dates are kept as text here; the handler resolves them in the planner's
//! time zone.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use waypoint_core::{
    params::{CreatePlan, CreateResource, Dependency, ListPlans, SetStatus, SwapMilestones},
    PlanStatus,
};

/// Personal planning tool: plans, milestones, tasks and due-date reminders
#[derive(Parser)]
#[command(version, about, name = "wp")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/waypoint/waypoint.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Manage milestones within a plan
    #[command(alias = "m")]
    Milestone {
        #[command(subcommand)]
        command: MilestoneCommands,
    },
    /// Manage tasks and their dependencies
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage reference links attached to a plan
    #[command(alias = "r")]
    Resource {
        #[command(subcommand)]
        command: ResourceCommands,
    },
    /// Show totals across all plans
    #[command(alias = "d")]
    Dashboard,
    /// Scan for due dates and manage notifications
    #[command(alias = "n")]
    Notify {
        #[command(subcommand)]
        command: NotifyCommands,
    },
}

// ============================================================================
// Plans
// ============================================================================

#[derive(ClapArgs)]
pub struct CreatePlanArgs {
    /// Title of the plan
    pub title: String,
    /// What the plan should achieve
    #[arg(short, long)]
    pub goal: String,
    /// Optional longer description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Free-form timeframe, e.g. "3 months"
    #[arg(short, long)]
    pub timeframe: Option<String>,
}

impl From<CreatePlanArgs> for CreatePlan {
    fn from(val: CreatePlanArgs) -> Self {
        CreatePlan {
            title: val.title,
            description: val.description,
            goal: val.goal,
            timeframe: val.timeframe,
        }
    }
}

#[derive(ClapArgs)]
pub struct ListPlansArgs {
    /// Only plans in this status (active, completed, paused, cancelled)
    #[arg(short, long, value_parser = parse_plan_status)]
    pub status: Option<PlanStatus>,
    /// Only plans whose title contains this text
    #[arg(long)]
    pub title: Option<String>,
}

impl From<ListPlansArgs> for ListPlans {
    fn from(val: ListPlansArgs) -> Self {
        ListPlans {
            status: val.status,
            title: val.title,
        }
    }
}

fn parse_plan_status(value: &str) -> Result<PlanStatus, String> {
    value.parse()
}

#[derive(ClapArgs)]
pub struct UpdatePlanArgs {
    /// ID of the plan to update
    pub id: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long)]
    pub goal: Option<String>,
    #[arg(short, long)]
    pub timeframe: Option<String>,
    /// New status (active, completed, paused, cancelled)
    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(ClapArgs)]
pub struct StatusArgs {
    /// ID of the entity
    pub id: u64,
    /// New status
    pub status: String,
}

impl From<StatusArgs> for SetStatus {
    fn from(val: StatusArgs) -> Self {
        SetStatus {
            id: val.id,
            status: val.status,
        }
    }
}

#[derive(ClapArgs)]
pub struct IdArgs {
    /// Unique identifier
    pub id: u64,
}

#[derive(ClapArgs)]
pub struct DeleteArgs {
    /// Unique identifier of the entity to delete
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

#[derive(ClapArgs)]
pub struct ImportPlanArgs {
    /// JSON file with title, description, milestones, tasks and tips
    pub file: PathBuf,
    /// Goal to record when the document has none
    #[arg(short, long)]
    pub goal: Option<String>,
    /// Timeframe to record when the document has none
    #[arg(short, long)]
    pub timeframe: Option<String>,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a new plan
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// List plans with their progress
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show a plan with its milestones, tasks and resources
    #[command(alias = "s")]
    Show(IdArgs),
    /// Update plan fields
    #[command(alias = "u")]
    Update(UpdatePlanArgs),
    /// Change a plan's status
    Status(StatusArgs),
    /// Delete a plan and everything in it
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteArgs),
    /// Import a generated plan from a JSON file
    Import(ImportPlanArgs),
    /// Show a plan's progress figures
    Progress(IdArgs),
}

// ============================================================================
// Milestones
// ============================================================================

#[derive(ClapArgs)]
pub struct AddMilestoneArgs {
    /// ID of the plan to add the milestone to
    pub plan_id: u64,
    /// Title of the milestone
    pub title: String,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Target date (YYYY-MM-DD or RFC 3339 timestamp)
    #[arg(long)]
    pub target_date: Option<String>,
}

#[derive(ClapArgs)]
pub struct UpdateMilestoneArgs {
    /// ID of the milestone to update
    pub id: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Target date (YYYY-MM-DD or RFC 3339 timestamp)
    #[arg(long, conflicts_with = "clear_target_date")]
    pub target_date: Option<String>,
    /// Remove the target date
    #[arg(long)]
    pub clear_target_date: bool,
    /// New status (todo, in_progress, completed)
    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(ClapArgs)]
pub struct SwapMilestonesArgs {
    pub milestone1_id: u64,
    pub milestone2_id: u64,
}

impl From<SwapMilestonesArgs> for SwapMilestones {
    fn from(val: SwapMilestonesArgs) -> Self {
        SwapMilestones {
            milestone1_id: val.milestone1_id,
            milestone2_id: val.milestone2_id,
        }
    }
}

#[derive(Subcommand)]
pub enum MilestoneCommands {
    /// Add a milestone to the end of a plan
    #[command(alias = "a")]
    Add(AddMilestoneArgs),
    /// List the milestones of a plan in order
    #[command(aliases = ["l", "ls"])]
    List(IdArgs),
    /// Update milestone fields
    #[command(alias = "u")]
    Update(UpdateMilestoneArgs),
    /// Change a milestone's status
    Status(StatusArgs),
    /// Delete a milestone; its tasks stay in the plan
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
    /// Swap the order of two milestones of the same plan
    #[command(alias = "sw")]
    Swap(SwapMilestonesArgs),
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(ClapArgs)]
pub struct AddTaskArgs {
    /// ID of the plan to add the task to
    pub plan_id: u64,
    /// Title of the task
    pub title: String,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Milestone of the same plan
    #[arg(short, long)]
    pub milestone: Option<u64>,
    /// low, medium, high or urgent
    #[arg(short, long)]
    pub priority: Option<String>,
    /// Estimated effort in hours
    #[arg(short, long)]
    pub estimate: Option<f64>,
    /// Due date (YYYY-MM-DD or RFC 3339 timestamp)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(ClapArgs)]
pub struct ListTasksArgs {
    /// Only tasks of this plan
    #[arg(long)]
    pub plan: Option<u64>,
    /// Only tasks of this milestone
    #[arg(short, long)]
    pub milestone: Option<u64>,
    /// Only tasks in this status
    #[arg(short, long)]
    pub status: Option<String>,
    /// Only tasks with this priority
    #[arg(short, long)]
    pub priority: Option<String>,
}

#[derive(ClapArgs)]
pub struct UpdateTaskArgs {
    /// ID of the task to update
    pub id: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// New status (todo, in_progress, completed, cancelled)
    #[arg(short, long)]
    pub status: Option<String>,
    #[arg(short, long)]
    pub priority: Option<String>,
    /// Estimated effort in hours
    #[arg(short, long)]
    pub estimate: Option<f64>,
    /// Hours actually spent
    #[arg(long)]
    pub actual: Option<f64>,
    /// Due date (YYYY-MM-DD or RFC 3339 timestamp)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
    /// Move to this milestone
    #[arg(short, long, conflicts_with = "clear_milestone")]
    pub milestone: Option<u64>,
    /// Detach from its milestone
    #[arg(long)]
    pub clear_milestone: bool,
}

#[derive(ClapArgs)]
pub struct DependencyArgs {
    /// Task that has to wait
    pub task_id: u64,
    /// Task that must be completed first
    pub prerequisite_id: u64,
}

impl From<DependencyArgs> for Dependency {
    fn from(val: DependencyArgs) -> Self {
        Dependency {
            dependent_id: val.task_id,
            prerequisite_id: val.prerequisite_id,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a plan
    #[command(alias = "a")]
    Add(AddTaskArgs),
    /// List tasks
    #[command(aliases = ["l", "ls"])]
    List(ListTasksArgs),
    /// Show one task with its prerequisites
    #[command(alias = "s")]
    Show(IdArgs),
    /// Update task fields
    #[command(alias = "u")]
    Update(UpdateTaskArgs),
    /// Change a task's status
    Status(StatusArgs),
    /// Delete a task and its dependency edges
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
    /// Make a task depend on another task of the same plan
    Depend(DependencyArgs),
    /// Remove a dependency
    Undepend(DependencyArgs),
    /// List open tasks of a plan whose prerequisites are all completed
    Actionable(IdArgs),
}

// ============================================================================
// Resources
// ============================================================================

#[derive(ClapArgs)]
pub struct AddResourceArgs {
    /// ID of the plan the resource belongs to
    pub plan_id: u64,
    /// Title of the resource
    pub title: String,
    #[arg(short, long)]
    pub url: Option<String>,
    /// Free-form kind, e.g. article, video, book
    #[arg(short, long)]
    pub kind: Option<String>,
}

impl From<AddResourceArgs> for CreateResource {
    fn from(val: AddResourceArgs) -> Self {
        CreateResource {
            plan_id: val.plan_id,
            title: val.title,
            url: val.url,
            kind: val.kind,
        }
    }
}

#[derive(Subcommand)]
pub enum ResourceCommands {
    /// Attach a resource to a plan
    #[command(alias = "a")]
    Add(AddResourceArgs),
    /// List the resources of a plan
    #[command(aliases = ["l", "ls"])]
    List(IdArgs),
    /// Delete a resource
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(ClapArgs)]
pub struct ListNotificationsArgs {
    /// Only unread notifications
    #[arg(short, long)]
    pub unread: bool,
}

#[derive(ClapArgs)]
pub struct ConfigArgs {
    /// Turn periodic scans on or off
    #[arg(long)]
    pub enabled: Option<bool>,
    /// Seconds between two scans
    #[arg(long)]
    pub interval: Option<u64>,
    /// How many hours ahead a due date triggers a reminder
    #[arg(long)]
    pub window: Option<u64>,
    /// Turn alert delivery on or off
    #[arg(long)]
    pub alerts: Option<bool>,
}

#[derive(Subcommand)]
pub enum NotifyCommands {
    /// Run one scan now
    Scan,
    /// List notifications, newest first
    #[command(aliases = ["l", "ls"])]
    List(ListNotificationsArgs),
    /// Mark a notification read
    Read(IdArgs),
    /// Mark every notification read
    ReadAll,
    /// Delete a notification
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
    /// Delete every notification
    Clear,
    /// Show or change the scan configuration
    Config(ConfigArgs),
    /// Scan periodically until interrupted with Ctrl-C
    Watch,
}
