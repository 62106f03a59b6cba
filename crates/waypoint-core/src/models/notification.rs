//! Notification records produced by the scan cycle.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// What a notification is about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A task is due within the reminder window
    DueDate,
    /// A task is past its due date
    Overdue,
    /// A plan reached completion
    Progress,
    /// A milestone was completed
    Milestone,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::DueDate => "due_date",
            NotificationKind::Overdue => "overdue",
            NotificationKind::Progress => "progress",
            NotificationKind::Milestone => "milestone",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "due_date" => Ok(NotificationKind::DueDate),
            "overdue" => Ok(NotificationKind::Overdue),
            "progress" => Ok(NotificationKind::Progress),
            "milestone" => Ok(NotificationKind::Milestone),
            _ => Err(format!("Invalid notification type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
}

impl NotificationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationPriority::Low => "low",
            NotificationPriority::Medium => "medium",
            NotificationPriority::High => "high",
        }
    }
}

impl FromStr for NotificationPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(NotificationPriority::Low),
            "medium" => Ok(NotificationPriority::Medium),
            "high" => Ok(NotificationPriority::High),
            _ => Err(format!("Invalid notification priority: {s}")),
        }
    }
}

/// A stored alert. Only `is_read` ever changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub task_id: Option<u64>,
    pub plan_id: Option<u64>,
    pub milestone_id: Option<u64>,
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub is_read: bool,
    pub priority: NotificationPriority,
}

/// A notification that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub task_id: Option<u64>,
    pub plan_id: Option<u64>,
    pub milestone_id: Option<u64>,
    pub due_date: Option<Timestamp>,
    pub priority: NotificationPriority,
}

/// Identity of the condition a notification reports.
///
/// `due_date` and `overdue` share a key: a task gets at most one of the two.
fn condition_key(
    kind: NotificationKind,
    task_id: Option<u64>,
    plan_id: Option<u64>,
    milestone_id: Option<u64>,
) -> Option<String> {
    match (kind, task_id, plan_id, milestone_id) {
        (NotificationKind::DueDate | NotificationKind::Overdue, Some(task), _, _) => {
            Some(format!("task:{task}:due"))
        }
        (NotificationKind::Milestone, _, Some(plan), Some(milestone)) => {
            Some(format!("milestone:{plan}:{milestone}"))
        }
        (NotificationKind::Progress, None, Some(plan), None) => {
            Some(format!("plan:{plan}:completed"))
        }
        _ => None,
    }
}

impl Notification {
    pub fn dedup_key(&self) -> Option<String> {
        condition_key(self.kind, self.task_id, self.plan_id, self.milestone_id)
    }
}

impl NewNotification {
    /// Key stored in the UNIQUE `dedup_key` column.
    pub fn dedup_key(&self) -> Option<String> {
        condition_key(self.kind, self.task_id, self.plan_id, self.milestone_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new(kind: NotificationKind, task: Option<u64>, milestone: Option<u64>) -> NewNotification {
        NewNotification {
            kind,
            title: "t".into(),
            message: "m".into(),
            task_id: task,
            plan_id: Some(3),
            milestone_id: milestone,
            due_date: None,
            priority: NotificationPriority::Medium,
        }
    }

    #[test]
    fn due_and_overdue_share_a_key() {
        let due = new(NotificationKind::DueDate, Some(9), None);
        let overdue = new(NotificationKind::Overdue, Some(9), None);
        assert_eq!(due.dedup_key(), overdue.dedup_key());
        assert_eq!(due.dedup_key().as_deref(), Some("task:9:due"));
    }

    #[test]
    fn milestone_and_plan_keys() {
        let milestone = new(NotificationKind::Milestone, None, Some(4));
        assert_eq!(milestone.dedup_key().as_deref(), Some("milestone:3:4"));
        let plan = new(NotificationKind::Progress, None, None);
        assert_eq!(plan.dedup_key().as_deref(), Some("plan:3:completed"));
    }

    #[test]
    fn kind_serializes_as_type() {
        let json = serde_json::to_value(NotificationKind::DueDate).unwrap();
        assert_eq!(json, "due_date");
        assert_eq!("overdue".parse::<NotificationKind>(), Ok(NotificationKind::Overdue));
        assert!("reminder".parse::<NotificationKind>().is_err());
    }
}
