//! Display implementations for domain models.
//!
//! This module contains all Display trait implementations for the core domain
//! models, separated from the model definitions to maintain clean separation of
//! concerns. Everything renders as markdown for the terminal renderer.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    DashboardStats, Milestone, MilestoneStatus, Notification, NotificationKind,
    NotificationPriority, Plan, PlanDetails, PlanProgress, PlanStatus, PlanSummary, Resource,
    Task, TaskPriority, TaskStatus,
};

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(
    PlanStatus,
    MilestoneStatus,
    TaskStatus,
    TaskPriority,
    NotificationKind,
    NotificationPriority,
);

fn fmt_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.0}h")
    } else {
        format!("{hours:.1}h")
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Goal: {}", self.goal)?;
        if let Some(timeframe) = &self.timeframe {
            writeln!(f, "- Timeframe: {timeframe}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        Ok(())
    }
}

impl fmt::Display for PlanProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- Tasks: {}/{} ({}%)",
            self.completed_tasks, self.total_tasks, self.task_progress
        )?;
        writeln!(
            f,
            "- Milestones: {}/{} ({}%)",
            self.completed_milestones, self.total_milestones, self.milestone_progress
        )?;
        writeln!(f, "- Overall: {}%", self.overall_progress)
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = &self.plan;
        writeln!(
            f,
            "## {} (ID: {}) {}%",
            plan.title, plan.id, self.progress.overall_progress
        )?;
        writeln!(f)?;
        writeln!(f, "- **Status**: {}", plan.status)?;
        writeln!(f, "- **Goal**: {}", plan.goal)?;
        if let Some(timeframe) = &plan.timeframe {
            writeln!(f, "- **Timeframe**: {timeframe}")?;
        }
        if self.progress.total_tasks > 0 {
            writeln!(
                f,
                "- **Tasks**: {}/{}",
                self.progress.completed_tasks, self.progress.total_tasks
            )?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&plan.created_at))?;
        writeln!(f)
    }
}

impl fmt::Display for PlanDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plan)?;

        writeln!(f, "\n## Progress")?;
        writeln!(f)?;
        write!(f, "{}", self.progress)?;

        if self.milestones.is_empty() {
            writeln!(f, "\nNo milestones in this plan.")?;
        } else {
            writeln!(f, "\n## Milestones")?;
            writeln!(f)?;
            for milestone in &self.milestones {
                write!(f, "{milestone}")?;
            }
        }

        if self.tasks.is_empty() {
            writeln!(f, "\nNo tasks in this plan.")?;
        } else {
            writeln!(f, "\n## Tasks")?;
            writeln!(f)?;
            for task in &self.tasks {
                write!(f, "{task}")?;
                let prerequisites: Vec<String> = self
                    .dependencies
                    .iter()
                    .filter(|d| d.dependent_id == task.id)
                    .map(|d| d.prerequisite_id.to_string())
                    .collect();
                if !prerequisites.is_empty() {
                    writeln!(f, "Depends on: {}", prerequisites.join(", "))?;
                    writeln!(f)?;
                }
            }
        }

        if !self.resources.is_empty() {
            writeln!(f, "\n## Resources")?;
            writeln!(f)?;
            for resource in &self.resources {
                write!(f, "{resource}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} [{}] ({})",
            self.order + 1,
            self.title,
            self.status,
            self.id
        )?;
        writeln!(f)?;
        if let Some(target) = &self.target_date {
            writeln!(f, "- Target: {}", LocalDateTime(target))?;
        }
        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.id,
            self.title,
            self.status.with_icon()
        )?;
        writeln!(f)?;

        writeln!(f, "- Priority: {}", self.priority)?;
        if let Some(milestone) = self.milestone_id {
            writeln!(f, "- Milestone: {milestone}")?;
        }
        if let Some(due) = &self.due_date {
            writeln!(f, "- Due: {}", LocalDateTime(due))?;
        }
        match (self.estimated_hours, self.actual_hours) {
            (Some(est), Some(actual)) => writeln!(
                f,
                "- Hours: {} of {} estimated",
                fmt_hours(actual),
                fmt_hours(est)
            )?,
            (Some(est), None) => writeln!(f, "- Estimate: {}", fmt_hours(est))?,
            (None, Some(actual)) => writeln!(f, "- Spent: {}", fmt_hours(actual))?,
            (None, None) => {}
        }
        if let Some(done) = &self.completed_at {
            writeln!(f, "- Completed: {}", LocalDateTime(done))?;
        }
        writeln!(f)?;

        if let Some(desc) = &self.description {
            writeln!(f, "{desc}")?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- {}. ", self.id)?;
        match &self.url {
            Some(url) => write!(f, "[{}]({url})", self.title)?,
            None => write!(f, "{}", self.title)?,
        }
        if let Some(kind) = &self.kind {
            write!(f, " ({kind})")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_read { " " } else { "•" };
        writeln!(
            f,
            "{marker} **{}** [{}, {}] (ID: {})",
            self.title, self.kind, self.priority, self.id
        )?;
        writeln!(f, "  {}", self.message)?;
        writeln!(f, "  _{}_", LocalDateTime(&self.created_at))
    }
}

impl fmt::Display for DashboardStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Dashboard")?;
        writeln!(f)?;
        writeln!(
            f,
            "- Plans: {} ({} active, {} completed)",
            self.total_plans, self.active_plans, self.completed_plans
        )?;
        writeln!(
            f,
            "- Tasks: {}/{} completed",
            self.completed_tasks, self.total_tasks
        )?;
        writeln!(f, "- Overdue: {}", self.overdue_tasks)?;
        writeln!(f, "- Overall progress: {}%", self.overall_progress)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn ts() -> Timestamp {
        Timestamp::from_second(1_640_995_200).unwrap()
    }

    fn task() -> Task {
        Task {
            id: 3,
            plan_id: 1,
            milestone_id: Some(2),
            title: "Draft chapter".to_string(),
            description: Some("First pass".to_string()),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            estimated_hours: Some(4.0),
            actual_hours: Some(1.5),
            due_date: None,
            completed_at: None,
            order: 0,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[test]
    fn task_shows_status_priority_and_hours() {
        let output = task().to_string();
        assert!(output.starts_with("### 3. Draft chapter (➤ In Progress)"));
        assert!(output.contains("- Priority: high"));
        assert!(output.contains("- Milestone: 2"));
        assert!(output.contains("- Hours: 1.5h of 4h estimated"));
        assert!(output.contains("First pass"));
    }

    #[test]
    fn resource_renders_as_link_when_url_present() {
        let mut resource = Resource {
            id: 4,
            plan_id: 1,
            title: "Rust book".to_string(),
            url: Some("https://doc.rust-lang.org/book/".to_string()),
            kind: Some("book".to_string()),
            created_at: ts(),
        };
        assert_eq!(
            resource.to_string(),
            "- 4. [Rust book](https://doc.rust-lang.org/book/) (book)\n"
        );

        resource.url = None;
        resource.kind = None;
        assert_eq!(resource.to_string(), "- 4. Rust book\n");
    }

    #[test]
    fn unread_notifications_are_marked() {
        let mut n = Notification {
            id: 9,
            kind: NotificationKind::Overdue,
            title: "Task overdue".to_string(),
            message: "\"Draft chapter\" was due 2022-01-01".to_string(),
            task_id: Some(3),
            plan_id: Some(1),
            milestone_id: None,
            due_date: Some(ts()),
            created_at: ts(),
            is_read: false,
            priority: NotificationPriority::High,
        };
        assert!(n.to_string().starts_with("• **Task overdue** [overdue, high] (ID: 9)"));
        n.is_read = true;
        assert!(n.to_string().starts_with("  **Task overdue**"));
    }

    #[test]
    fn dashboard_lists_counts() {
        let stats = DashboardStats {
            total_plans: 3,
            active_plans: 2,
            completed_plans: 1,
            total_tasks: 10,
            completed_tasks: 4,
            overdue_tasks: 1,
            overall_progress: 40,
        };
        let output = stats.to_string();
        assert!(output.contains("- Plans: 3 (2 active, 1 completed)"));
        assert!(output.contains("- Tasks: 4/10 completed"));
        assert!(output.contains("- Overall progress: 40%"));
    }
}
