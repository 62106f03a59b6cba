//! Pure evaluation step of a scan cycle.
//!
//! [`evaluate_plan`] looks at one plan snapshot and returns the notifications
//! that should exist but do not yet. It never touches the store, which keeps
//! the due-date arithmetic testable with fixed instants.

use std::collections::HashSet;

use jiff::{tz::TimeZone, SignedDuration, Timestamp};

use crate::{
    db::plan_queries::PlanSnapshot,
    display::LocalDate,
    models::{
        MilestoneStatus, NewNotification, Notification, NotificationKind, NotificationPriority,
        PlanStatus, Task,
    },
};

/// Conditions that already have a notification.
#[derive(Debug, Clone, Default)]
pub struct Seen {
    keys: HashSet<String>,
    /// (plan, message) of milestone notifications; matches by title even for
    /// rows stored without a milestone id
    milestone_messages: HashSet<(u64, String)>,
}

impl Seen {
    /// Builds the set from notifications already in the store.
    pub fn from_notifications<'a, I>(notifications: I) -> Self
    where
        I: IntoIterator<Item = &'a Notification>,
    {
        let mut seen = Self::default();
        for n in notifications {
            if let Some(key) = n.dedup_key() {
                seen.keys.insert(key);
            }
            if let (NotificationKind::Milestone, Some(plan)) = (n.kind, n.plan_id) {
                seen.milestone_messages.insert((plan, n.message.clone()));
            }
        }
        seen
    }

    /// True when `candidate` matches a stored or recorded notification.
    pub fn contains(&self, candidate: &NewNotification) -> bool {
        let by_key = candidate
            .dedup_key()
            .is_some_and(|key| self.keys.contains(&key));
        let by_title = candidate.kind == NotificationKind::Milestone
            && candidate.plan_id.is_some_and(|plan| {
                self.milestone_messages
                    .contains(&(plan, candidate.message.clone()))
            });
        by_key || by_title
    }

    /// Marks `notification` as seen for the rest of the cycle.
    pub fn record(&mut self, notification: &NewNotification) {
        if let Some(key) = notification.dedup_key() {
            self.keys.insert(key);
        }
        if let (NotificationKind::Milestone, Some(plan)) =
            (notification.kind, notification.plan_id)
        {
            self.milestone_messages
                .insert((plan, notification.message.clone()));
        }
    }
}

fn due_notification(
    task: &Task,
    due: Timestamp,
    now: Timestamp,
    window: SignedDuration,
    tz: &TimeZone,
) -> Option<NewNotification> {
    let horizon = now.checked_add(window).unwrap_or(Timestamp::MAX);
    let date = LocalDate(&due, tz);

    let (kind, title, message, priority) = if due < now {
        (
            NotificationKind::Overdue,
            "Task overdue",
            format!("\"{}\" was due {date}", task.title),
            NotificationPriority::High,
        )
    } else if due <= horizon {
        let due_today = due.to_zoned(tz.clone()).date() == now.to_zoned(tz.clone()).date();
        (
            NotificationKind::DueDate,
            "Task due soon",
            format!("\"{}\" is due {date}", task.title),
            if due_today {
                NotificationPriority::High
            } else {
                NotificationPriority::Medium
            },
        )
    } else {
        return None;
    };

    Some(NewNotification {
        kind,
        title: title.to_string(),
        message,
        task_id: Some(task.id),
        plan_id: Some(task.plan_id),
        milestone_id: None,
        due_date: Some(due),
        priority,
    })
}

/// Notifications one plan calls for that `seen` does not already cover.
///
/// * open tasks (anything but completed) with a due date: `overdue` when the
///   date has passed, `due_date` when it falls within `window`
/// * completed milestones: one `milestone` notification each
/// * a completed plan: one `progress` notification
pub fn evaluate_plan(
    snapshot: &PlanSnapshot,
    seen: &Seen,
    now: Timestamp,
    window: SignedDuration,
    tz: &TimeZone,
) -> Vec<NewNotification> {
    let plan = &snapshot.plan;
    let mut candidates = Vec::new();

    for task in snapshot.tasks.iter().filter(|t| !t.is_completed()) {
        if let Some(n) = task
            .due_date
            .and_then(|due| due_notification(task, due, now, window, tz))
        {
            candidates.push(n);
        }
    }

    for milestone in snapshot
        .milestones
        .iter()
        .filter(|m| m.status == MilestoneStatus::Completed)
    {
        candidates.push(NewNotification {
            kind: NotificationKind::Milestone,
            title: "Milestone completed".to_string(),
            message: format!("Milestone \"{}\" completed in {}", milestone.title, plan.title),
            task_id: None,
            plan_id: Some(plan.id),
            milestone_id: Some(milestone.id),
            due_date: None,
            priority: NotificationPriority::Medium,
        });
    }

    if plan.status == PlanStatus::Completed {
        candidates.push(NewNotification {
            kind: NotificationKind::Progress,
            title: "Plan completed".to_string(),
            message: format!("Plan \"{}\" is complete", plan.title),
            task_id: None,
            plan_id: Some(plan.id),
            milestone_id: None,
            due_date: None,
            priority: NotificationPriority::High,
        });
    }

    candidates.retain(|c| !seen.contains(c));
    candidates
}
