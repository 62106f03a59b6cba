//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper formats its items with their own Display impl and prints a
//! fixed "No ... found." line when empty.

use std::{fmt, ops::Index};

use crate::models::{Milestone, Notification, PlanSummary, Resource, Task};

macro_rules! collection {
    ($(#[$meta:meta])* $name:ident, $item:ty, $empty:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $name(pub Vec<$item>);

        impl $name {
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $name {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.0.is_empty() {
                    return writeln!(f, $empty);
                }
                for item in &self.0 {
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    };
}

collection!(
    /// Plans with their progress, as returned by
    /// [`Planner::list_plans_summary`](crate::Planner::list_plans_summary).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waypoint_core::{
    ///     display::PlanSummaries,
    ///     models::{Plan, PlanProgress, PlanStatus, PlanSummary},
    /// };
    /// use jiff::Timestamp;
    ///
    /// let summary = PlanSummary {
    ///     plan: Plan {
    ///         id: 1,
    ///         title: "Learn Rust".to_string(),
    ///         description: None,
    ///         goal: "Ship a CLI".to_string(),
    ///         timeframe: Some("3 months".to_string()),
    ///         status: PlanStatus::Active,
    ///         created_at: Timestamp::now(),
    ///         updated_at: Timestamp::now(),
    ///     },
    ///     progress: PlanProgress::default(),
    /// };
    ///
    /// let output = PlanSummaries(vec![summary]).to_string();
    /// assert!(output.contains("Learn Rust"));
    /// ```
    PlanSummaries,
    PlanSummary,
    "No plans found."
);

collection!(
    /// Tasks, in the order they were listed.
    Tasks,
    Task,
    "No tasks found."
);

collection!(Milestones, Milestone, "No milestones found.");

collection!(Resources, Resource, "No resources found.");

collection!(
    /// Notifications, newest first.
    Notifications,
    Notification,
    "No notifications."
);

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{Plan, PlanProgress, PlanStatus, TaskPriority, TaskStatus};

    fn ts() -> Timestamp {
        Timestamp::from_second(1_640_995_200).unwrap() // 2022-01-01 00:00:00 UTC
    }

    fn summary(id: u64, title: &str, overall: u8) -> PlanSummary {
        PlanSummary {
            plan: Plan {
                id,
                title: title.to_string(),
                description: None,
                goal: "Finish".to_string(),
                timeframe: None,
                status: PlanStatus::Active,
                created_at: ts(),
                updated_at: ts(),
            },
            progress: PlanProgress {
                plan_id: id,
                total_tasks: 4,
                completed_tasks: 2,
                overall_progress: overall,
                ..Default::default()
            },
        }
    }

    fn task(id: u64, title: &str, status: TaskStatus) -> Task {
        Task {
            id,
            plan_id: 1,
            milestone_id: None,
            title: title.to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            estimated_hours: None,
            actual_hours: None,
            due_date: None,
            completed_at: None,
            order: 0,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[test]
    fn plan_summaries_display() {
        let output = PlanSummaries(vec![summary(1, "Test Plan", 50), summary(2, "Second", 0)])
            .to_string();
        assert!(output.contains("## Test Plan (ID: 1) 50%"));
        assert!(output.contains("## Second (ID: 2) 0%"));
        assert!(output.contains("- **Tasks**: 2/4"));
        assert!(!output.starts_with("# "));

        assert_eq!(PlanSummaries(vec![]).to_string(), "No plans found.\n");
    }

    #[test]
    fn tasks_display() {
        let tasks = Tasks(vec![
            task(1, "Outline", TaskStatus::Todo),
            task(2, "Draft", TaskStatus::Completed),
        ]);
        let output = tasks.to_string();
        assert!(output.contains("○ Todo"));
        assert!(output.contains("✓ Completed"));
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].title, "Draft");

        assert_eq!(Tasks::default().to_string(), "No tasks found.\n");
    }

    #[test]
    fn empty_notifications_message() {
        assert_eq!(Notifications(vec![]).to_string(), "No notifications.\n");
    }
}
