//! Completion ratios for plans and the system-wide dashboard.
//!
//! Pure functions over snapshots; the planner reads the snapshot inside one
//! read transaction and hands it here.

use jiff::Timestamp;

use crate::models::{
    DashboardStats, Milestone, MilestoneStatus, Plan, PlanProgress, PlanStatus, Task,
};

/// `part / whole` as a 0-100 integer, rounded half-up. Zero when `whole == 0`.
pub fn percent(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part.min(whole));
    let whole = u64::from(whole);
    // (100·n + d/2) / d rounds half-up without floating point
    ((part * 100 + whole / 2) / whole) as u8
}

/// Progress of one plan.
///
/// A completed plan reports 100 for every percentage regardless of its
/// children; otherwise empty collections report 0.
pub fn compute_progress(plan: &Plan, milestones: &[Milestone], tasks: &[Task]) -> PlanProgress {
    let total_tasks = tasks.len() as u32;
    let completed_tasks = tasks.iter().filter(|t| t.is_completed()).count() as u32;
    let total_milestones = milestones.len() as u32;
    let completed_milestones = milestones
        .iter()
        .filter(|m| m.status == MilestoneStatus::Completed)
        .count() as u32;

    let (task_progress, milestone_progress) = if plan.status == PlanStatus::Completed {
        (100, 100)
    } else {
        (
            percent(completed_tasks, total_tasks),
            percent(completed_milestones, total_milestones),
        )
    };

    PlanProgress {
        plan_id: plan.id,
        total_tasks,
        completed_tasks,
        total_milestones,
        completed_milestones,
        task_progress,
        milestone_progress,
        overall_progress: task_progress,
    }
}

/// Figures across every plan and task in the store.
pub fn compute_dashboard(plans: &[Plan], tasks: &[Task], now: Timestamp) -> DashboardStats {
    let total_tasks = tasks.len() as u32;
    let completed_tasks = tasks.iter().filter(|t| t.is_completed()).count() as u32;

    DashboardStats {
        total_plans: plans.len() as u32,
        active_plans: plans
            .iter()
            .filter(|p| p.status == PlanStatus::Active)
            .count() as u32,
        completed_plans: plans
            .iter()
            .filter(|p| p.status == PlanStatus::Completed)
            .count() as u32,
        total_tasks,
        completed_tasks,
        overdue_tasks: tasks.iter().filter(|t| t.is_overdue(now)).count() as u32,
        overall_progress: percent(completed_tasks, total_tasks),
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;
    use crate::models::{TaskPriority, TaskStatus};

    fn now() -> Timestamp {
        "2026-06-15T12:00:00Z".parse().unwrap()
    }

    fn plan(status: PlanStatus) -> Plan {
        Plan {
            id: 7,
            title: "Learn Spanish".into(),
            description: None,
            goal: "Hold a conversation".into(),
            timeframe: None,
            status,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn task(id: u64, status: TaskStatus, due_in_hours: Option<i64>) -> Task {
        Task {
            id,
            plan_id: 7,
            milestone_id: None,
            title: format!("Task {id}"),
            description: None,
            status,
            priority: TaskPriority::Medium,
            estimated_hours: None,
            actual_hours: None,
            due_date: due_in_hours.map(|h| now() + SignedDuration::from_hours(h)),
            completed_at: (status == TaskStatus::Completed).then(now),
            order: id as u32,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn milestone(id: u64, status: MilestoneStatus) -> Milestone {
        Milestone {
            id,
            plan_id: 7,
            title: format!("Milestone {id}"),
            description: None,
            target_date: None,
            status,
            order: id as u32,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13); // 12.5
        assert_eq!(percent(1, 200), 1); // 0.5
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(5, 5), 100);
    }

    #[test]
    fn empty_active_plan_reports_zero() {
        let progress = compute_progress(&plan(PlanStatus::Active), &[], &[]);
        assert_eq!(progress.task_progress, 0);
        assert_eq!(progress.milestone_progress, 0);
        assert_eq!(progress.overall_progress, 0);
    }

    #[test]
    fn completed_plan_overrides_children() {
        let tasks = [
            task(1, TaskStatus::Todo, None),
            task(2, TaskStatus::InProgress, None),
        ];
        let milestones = [milestone(1, MilestoneStatus::Todo)];
        let progress = compute_progress(&plan(PlanStatus::Completed), &milestones, &tasks);
        assert_eq!(progress.task_progress, 100);
        assert_eq!(progress.milestone_progress, 100);
        assert_eq!(progress.overall_progress, 100);
        assert_eq!(progress.completed_tasks, 0);

        let empty = compute_progress(&plan(PlanStatus::Completed), &[], &[]);
        assert_eq!(empty.overall_progress, 100);
    }

    #[test]
    fn ratios_for_partial_plan() {
        let tasks = [
            task(1, TaskStatus::Completed, None),
            task(2, TaskStatus::Completed, None),
            task(3, TaskStatus::Cancelled, None),
        ];
        let milestones = [
            milestone(1, MilestoneStatus::Completed),
            milestone(2, MilestoneStatus::InProgress),
        ];
        let progress = compute_progress(&plan(PlanStatus::Active), &milestones, &tasks);
        assert_eq!(progress.total_tasks, 3);
        assert_eq!(progress.completed_tasks, 2);
        assert_eq!(progress.task_progress, 67);
        assert_eq!(progress.milestone_progress, 50);
        assert_eq!(progress.overall_progress, 67);
    }

    #[test]
    fn dashboard_counts_overdue_and_plans() {
        let plans = [
            plan(PlanStatus::Active),
            plan(PlanStatus::Completed),
            plan(PlanStatus::Paused),
        ];
        let tasks = [
            task(1, TaskStatus::Todo, Some(-24)),
            task(2, TaskStatus::Completed, Some(-24)),
            task(3, TaskStatus::InProgress, Some(24)),
            task(4, TaskStatus::Todo, None),
        ];
        let stats = compute_dashboard(&plans, &tasks, now());
        assert_eq!(stats.total_plans, 3);
        assert_eq!(stats.active_plans, 1);
        assert_eq!(stats.completed_plans, 1);
        assert_eq!(stats.total_tasks, 4);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.overdue_tasks, 1);
        assert_eq!(stats.overall_progress, 25);
    }

    #[test]
    fn dashboard_without_tasks_is_zero() {
        let stats = compute_dashboard(&[], &[], now());
        assert_eq!(stats.overall_progress, 0);
        assert_eq!(stats.overdue_tasks, 0);
    }
}
