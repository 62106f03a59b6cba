//! Command handlers
//!
//! [`Cli`] turns parsed arguments into planner calls and renders the result
//! as markdown. Every handler prints exactly one document; errors propagate to
//! `main` and end the process with a non-zero exit code.

use std::fmt::Display;

use anyhow::{bail, Context, Result};
use waypoint_core::{
    display::{Milestones, Resources},
    generate::GeneratedPlan,
    notify::NotificationConfig,
    params::{
        parse_due_date, CreateMilestone, CreateTask, ListPlans, ListTasks, SetStatus,
        UpdateMilestone, UpdatePlan, UpdateTask,
    },
    CreateResult, DeleteResult, NotificationConfigUpdate, NotificationEngine, Notifications,
    OperationStatus, Planner, PlannerError, Tasks, UpdateResult,
};

use crate::{
    args::{
        AddMilestoneArgs, AddTaskArgs, ConfigArgs, ImportPlanArgs, ListTasksArgs,
        MilestoneCommands, NotifyCommands, PlanCommands, ResourceCommands, TaskCommands,
        UpdateMilestoneArgs, UpdatePlanArgs, UpdateTaskArgs,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    fn render(&self, output: impl Display) -> Result<()> {
        self.renderer.render(&output.to_string())
    }

    fn due_date(&self, value: Option<&str>) -> Result<Option<jiff::Timestamp>> {
        value
            .map(|v| parse_due_date(v, self.planner.time_zone()))
            .transpose()
            .map_err(Into::into)
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => {
                let plan = self.planner.create_plan(&args.into()).await?;
                self.render(CreateResult::new(plan))
            }
            PlanCommands::List(args) => self.list_plans(&args.into()).await,
            PlanCommands::Show(args) => {
                let details = self.planner.plan_details(args.id).await?;
                self.render(details)
            }
            PlanCommands::Update(args) => self.update_plan(args).await,
            PlanCommands::Status(args) => {
                let status = args.status.clone();
                let plan = self.planner.set_plan_status(&SetStatus::from(args)).await?;
                self.render(UpdateResult::with_changes(
                    plan,
                    vec![format!("Status: {status}")],
                ))
            }
            PlanCommands::Delete(args) => {
                if !args.confirm {
                    bail!(
                        "Deleting plan {} also deletes its milestones, tasks and resources. \
                         Re-run with --confirm to proceed.",
                        args.id
                    );
                }
                let plan = self.planner.delete_plan(args.id).await?;
                self.render(DeleteResult::new(plan))
            }
            PlanCommands::Import(args) => self.import_plan(args).await,
            PlanCommands::Progress(args) => {
                let progress = self.planner.plan_progress(args.id).await?;
                self.render(format!("# Progress of plan {}\n\n{progress}", args.id))
            }
        }
    }

    pub async fn list_plans(&self, params: &ListPlans) -> Result<()> {
        let summaries = self.planner.list_plans_summary(params).await?;
        self.render(summaries)
    }

    async fn update_plan(&self, args: UpdatePlanArgs) -> Result<()> {
        let mut changes = Vec::new();
        if let Some(title) = &args.title {
            changes.push(format!("Title: {title}"));
        }
        if args.description.is_some() {
            changes.push("Description updated".to_string());
        }
        if let Some(goal) = &args.goal {
            changes.push(format!("Goal: {goal}"));
        }
        if let Some(timeframe) = &args.timeframe {
            changes.push(format!("Timeframe: {timeframe}"));
        }
        if let Some(status) = &args.status {
            changes.push(format!("Status: {status}"));
        }

        let plan = self
            .planner
            .update_plan(&UpdatePlan {
                id: args.id,
                title: args.title,
                description: args.description,
                goal: args.goal,
                timeframe: args.timeframe,
                status: args.status,
            })
            .await?;
        self.render(UpdateResult::with_changes(plan, changes))
    }

    async fn import_plan(&self, args: ImportPlanArgs) -> Result<()> {
        let text = std::fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;
        let generated: GeneratedPlan = serde_json::from_str(&text)
            .with_context(|| format!("{} is not a valid plan document", args.file.display()))?;

        let details = self
            .planner
            .import_generated_plan(
                generated,
                args.goal.as_deref().unwrap_or_default(),
                args.timeframe.as_deref(),
            )
            .await?;
        self.render(format!(
            "Imported plan with ID: {}\n\n{details}",
            details.plan.id
        ))
    }

    pub async fn handle_milestone_command(&self, command: MilestoneCommands) -> Result<()> {
        match command {
            MilestoneCommands::Add(args) => self.add_milestone(args).await,
            MilestoneCommands::List(args) => {
                let milestones = self.planner.list_milestones(args.id).await?;
                self.render(Milestones(milestones))
            }
            MilestoneCommands::Update(args) => self.update_milestone(args).await,
            MilestoneCommands::Status(args) => {
                let status = args.status.clone();
                let milestone = self
                    .planner
                    .set_milestone_status(&SetStatus::from(args))
                    .await?;
                self.render(UpdateResult::with_changes(
                    milestone,
                    vec![format!("Status: {status}")],
                ))
            }
            MilestoneCommands::Delete(args) => {
                let milestone = self.planner.delete_milestone(args.id).await?;
                self.render(DeleteResult::new(milestone))
            }
            MilestoneCommands::Swap(args) => {
                let (first, second) = self.planner.swap_milestones(&args.into()).await?;
                self.render(OperationStatus::success(format!(
                    "Swapped milestones {} and {}",
                    first.id, second.id
                )))
            }
        }
    }

    async fn add_milestone(&self, args: AddMilestoneArgs) -> Result<()> {
        let target_date = self.due_date(args.target_date.as_deref())?;
        let milestone = self
            .planner
            .add_milestone(&CreateMilestone {
                plan_id: args.plan_id,
                title: args.title,
                description: args.description,
                target_date,
            })
            .await?;
        self.render(CreateResult::new(milestone))
    }

    async fn update_milestone(&self, args: UpdateMilestoneArgs) -> Result<()> {
        let target_date = self.due_date(args.target_date.as_deref())?;
        let mut changes = Vec::new();
        if let Some(title) = &args.title {
            changes.push(format!("Title: {title}"));
        }
        if args.description.is_some() {
            changes.push("Description updated".to_string());
        }
        if let Some(date) = &args.target_date {
            changes.push(format!("Target date: {date}"));
        }
        if args.clear_target_date {
            changes.push("Target date cleared".to_string());
        }
        if let Some(status) = &args.status {
            changes.push(format!("Status: {status}"));
        }

        let milestone = self
            .planner
            .update_milestone(&UpdateMilestone {
                id: args.id,
                title: args.title,
                description: args.description,
                target_date,
                clear_target_date: args.clear_target_date,
                status: args.status,
            })
            .await?;
        self.render(UpdateResult::with_changes(milestone, changes))
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Add(args) => self.add_task(args).await,
            TaskCommands::List(args) => self.list_tasks(args).await,
            TaskCommands::Show(args) => {
                let task = self
                    .planner
                    .get_task(args.id)
                    .await?
                    .ok_or(PlannerError::NotFound {
                        entity: "Task",
                        id: args.id,
                    })?;
                let prerequisites = self.planner.prerequisites(args.id).await?;
                let mut output = task.to_string();
                if !prerequisites.is_empty() {
                    output.push_str("\n## Prerequisites\n\n");
                    output.push_str(&Tasks(prerequisites).to_string());
                }
                self.render(output)
            }
            TaskCommands::Update(args) => self.update_task(args).await,
            TaskCommands::Status(args) => {
                let status = args.status.clone();
                let task = self.planner.set_task_status(&SetStatus::from(args)).await?;
                self.render(UpdateResult::with_changes(
                    task,
                    vec![format!("Status: {status}")],
                ))
            }
            TaskCommands::Delete(args) => {
                let task = self.planner.delete_task(args.id).await?;
                self.render(DeleteResult::new(task))
            }
            TaskCommands::Depend(args) => {
                let edge = self.planner.add_dependency(&args.into()).await?;
                self.render(CreateResult::new(edge))
            }
            TaskCommands::Undepend(args) => {
                let edge = self.planner.remove_dependency(&args.into()).await?;
                self.render(DeleteResult::new(edge))
            }
            TaskCommands::Actionable(args) => {
                let tasks = self.planner.actionable_tasks(args.id).await?;
                self.render(Tasks(tasks))
            }
        }
    }

    async fn add_task(&self, args: AddTaskArgs) -> Result<()> {
        let due_date = self.due_date(args.due.as_deref())?;
        let task = self
            .planner
            .add_task(&CreateTask {
                plan_id: args.plan_id,
                milestone_id: args.milestone,
                title: args.title,
                description: args.description,
                priority: args.priority,
                estimated_hours: args.estimate,
                due_date,
            })
            .await?;
        self.render(CreateResult::new(task))
    }

    async fn list_tasks(&self, args: ListTasksArgs) -> Result<()> {
        let tasks = self
            .planner
            .list_tasks_display(&ListTasks {
                plan_id: args.plan,
                milestone_id: args.milestone,
                status: args.status,
                priority: args.priority,
            })
            .await?;
        self.render(tasks)
    }

    async fn update_task(&self, args: UpdateTaskArgs) -> Result<()> {
        let due_date = self.due_date(args.due.as_deref())?;
        let mut changes = Vec::new();
        if let Some(title) = &args.title {
            changes.push(format!("Title: {title}"));
        }
        if args.description.is_some() {
            changes.push("Description updated".to_string());
        }
        if let Some(status) = &args.status {
            changes.push(format!("Status: {status}"));
        }
        if let Some(priority) = &args.priority {
            changes.push(format!("Priority: {priority}"));
        }
        if let Some(hours) = args.estimate {
            changes.push(format!("Estimated hours: {hours}"));
        }
        if let Some(hours) = args.actual {
            changes.push(format!("Actual hours: {hours}"));
        }
        if let Some(due) = &args.due {
            changes.push(format!("Due: {due}"));
        }
        if args.clear_due {
            changes.push("Due date cleared".to_string());
        }
        if let Some(milestone) = args.milestone {
            changes.push(format!("Milestone: {milestone}"));
        }
        if args.clear_milestone {
            changes.push("Milestone cleared".to_string());
        }

        let task = self
            .planner
            .update_task(&UpdateTask {
                id: args.id,
                title: args.title,
                description: args.description,
                status: args.status,
                priority: args.priority,
                estimated_hours: args.estimate,
                actual_hours: args.actual,
                due_date,
                clear_due_date: args.clear_due,
                milestone_id: args.milestone,
                clear_milestone: args.clear_milestone,
            })
            .await?;
        self.render(UpdateResult::with_changes(task, changes))
    }

    pub async fn handle_resource_command(&self, command: ResourceCommands) -> Result<()> {
        match command {
            ResourceCommands::Add(args) => {
                let resource = self.planner.add_resource(&args.into()).await?;
                self.render(CreateResult::new(resource))
            }
            ResourceCommands::List(args) => {
                let resources = self.planner.list_resources(args.id).await?;
                self.render(Resources(resources))
            }
            ResourceCommands::Delete(args) => {
                let resource = self.planner.delete_resource(args.id).await?;
                self.render(DeleteResult::new(resource))
            }
        }
    }

    pub async fn dashboard(&self) -> Result<()> {
        let stats = self.planner.dashboard().await?;
        self.render(stats)
    }

    pub async fn handle_notify_command(&self, command: NotifyCommands) -> Result<()> {
        let engine = NotificationEngine::new(self.planner.clone()).await?;

        match command {
            NotifyCommands::Scan => {
                let report = engine.scan().await?;
                let mut output = format!(
                    "Stored {} new notifications\n",
                    report.created.len()
                );
                if !report.failed_plans.is_empty() {
                    let ids: Vec<String> =
                        report.failed_plans.iter().map(u64::to_string).collect();
                    output.push_str(&format!("Skipped plans: {}\n", ids.join(", ")));
                }
                if !report.created.is_empty() {
                    output.push('\n');
                    output.push_str(&Notifications(report.created).to_string());
                }
                self.render(output)
            }
            NotifyCommands::List(args) => {
                let notifications = if args.unread {
                    engine.list_unread().await?
                } else {
                    engine.list().await?
                };
                self.render(Notifications(notifications))
            }
            NotifyCommands::Read(args) => {
                let status = if engine.mark_read(args.id).await? {
                    OperationStatus::success(format!("Marked notification {} read", args.id))
                } else {
                    OperationStatus::failure(format!("No notification with ID {}", args.id))
                };
                self.render(status)
            }
            NotifyCommands::ReadAll => {
                let count = engine.mark_all_read().await?;
                self.render(OperationStatus::success(format!(
                    "Marked {count} notifications read"
                )))
            }
            NotifyCommands::Delete(args) => {
                let status = if engine.delete(args.id).await? {
                    OperationStatus::success(format!("Deleted notification {}", args.id))
                } else {
                    OperationStatus::failure(format!("No notification with ID {}", args.id))
                };
                self.render(status)
            }
            NotifyCommands::Clear => {
                let count = engine.clear_all().await?;
                self.render(OperationStatus::success(format!(
                    "Deleted {count} notifications"
                )))
            }
            NotifyCommands::Config(args) => {
                let update = NotificationConfigUpdate::from(args);
                let config = if update.is_empty() {
                    engine.get_config()
                } else {
                    engine.update_config(update).await?
                };
                self.render(config_markdown(&config))
            }
            NotifyCommands::Watch => {
                engine.start()?;
                self.render(format!(
                    "Watching for due dates every {}s. Press Ctrl-C to stop.\n",
                    engine.get_config().scan_interval_secs
                ))?;
                tokio::signal::ctrl_c()
                    .await
                    .context("Failed to listen for Ctrl-C")?;
                engine.stop().await;
                log::info!("Notification watch stopped");
                Ok(())
            }
        }
    }
}

impl From<ConfigArgs> for NotificationConfigUpdate {
    fn from(val: ConfigArgs) -> Self {
        NotificationConfigUpdate {
            enabled: val.enabled,
            scan_interval_secs: val.interval,
            reminder_window_hours: val.window,
            alerts_enabled: val.alerts,
        }
    }
}

fn config_markdown(config: &NotificationConfig) -> String {
    format!(
        "# Notification settings\n\n\
         - **Scans enabled**: {}\n\
         - **Scan interval**: {}s\n\
         - **Reminder window**: {}h\n\
         - **Alerts enabled**: {}\n",
        config.enabled,
        config.scan_interval_secs,
        config.reminder_window_hours,
        config.alerts_enabled
    )
}
