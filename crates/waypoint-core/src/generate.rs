//! Boundary to the plan-generation subsystem.
//!
//! A [`PlanGenerator`] turns a goal description into a candidate tree of
//! milestones and tasks. Its output is untrusted: [`GeneratedPlan::validate`]
//! runs every field through the same validators as manual creation and
//! produces a [`PlanTree`] that the store inserts in one transaction.

use jiff::{tz::TimeZone, Timestamp};
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlannerError, Result},
    models::TaskPriority,
    params::{self, CreatePlan},
};

/// Produces candidate plans from a goal description.
pub trait PlanGenerator: Send + Sync {
    /// Generates a plan for `goal`.
    ///
    /// # Errors
    ///
    /// Implementations report transport or parse problems as
    /// `PlannerError::GenerationFailed`; the planner passes them through
    /// unchanged.
    fn generate(&self, goal: &str, timeframe: Option<&str>) -> Result<GeneratedPlan>;
}

/// Raw generator output, as loosely shaped as a JSON document can be.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlan {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub milestones: Vec<GeneratedMilestone>,
    #[serde(default)]
    pub tasks: Vec<GeneratedTask>,
    #[serde(default)]
    pub estimated_timeframe: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMilestone {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Date or timestamp text
    #[serde(default)]
    pub target_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTask {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    /// Date or timestamp text
    #[serde(default)]
    pub due_date: Option<String>,
    /// Index into [`GeneratedPlan::milestones`]
    #[serde(default)]
    pub milestone: Option<usize>,
}

/// A validated plan ready to be stored.
#[derive(Debug, Clone)]
pub struct PlanTree {
    pub plan: CreatePlan,
    pub milestones: Vec<TreeMilestone>,
    pub tasks: Vec<TreeTask>,
}

#[derive(Debug, Clone)]
pub struct TreeMilestone {
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<Timestamp>,
}

#[derive(Debug, Clone)]
pub struct TreeTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub estimated_hours: Option<f64>,
    pub due_date: Option<Timestamp>,
    pub milestone_index: Option<usize>,
}

impl GeneratedPlan {
    /// Validates the candidate against the creation rules.
    ///
    /// `goal` and `timeframe` fill in for fields the generator left empty;
    /// tips are folded into the description.
    ///
    /// # Errors
    ///
    /// `PlannerError::InvalidInput` naming the first offending field, e.g.
    /// `tasks[2].priority`.
    pub fn validate(self, goal: &str, timeframe: Option<&str>, tz: &TimeZone) -> Result<PlanTree> {
        let description = match (params::non_blank(self.description), self.tips.is_empty()) {
            (desc, true) => desc,
            (desc, false) => {
                let tips: Vec<String> = self.tips.iter().map(|t| format!("- {t}")).collect();
                let tips = format!("Tips:\n{}", tips.join("\n"));
                Some(match desc {
                    Some(desc) => format!("{desc}\n\n{tips}"),
                    None => tips,
                })
            }
        };

        let plan = CreatePlan {
            title: self.title,
            description,
            goal: params::non_blank(self.goal).unwrap_or_else(|| goal.to_string()),
            timeframe: params::non_blank(self.estimated_timeframe)
                .or_else(|| params::non_blank(timeframe.map(String::from))),
        };
        plan.validate()?;

        let milestone_count = self.milestones.len();
        let milestones = self
            .milestones
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                params::validate_title(&format!("milestones[{i}].title"), &m.title)?;
                let target_date = m
                    .target_date
                    .as_deref()
                    .map(|d| params::parse_due_date(d, tz))
                    .transpose()
                    .map_err(|e| field_error(format!("milestones[{i}].target_date"), e))?;
                Ok(TreeMilestone {
                    title: m.title,
                    description: m.description,
                    target_date,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let tasks = self
            .tasks
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                params::validate_title(&format!("tasks[{i}].title"), &t.title)?;
                params::validate_hours(&format!("tasks[{i}].estimated_hours"), t.estimated_hours)?;
                let priority = t
                    .priority
                    .as_deref()
                    .map(params::parse_priority)
                    .transpose()
                    .map_err(|e| field_error(format!("tasks[{i}].priority"), e))?
                    .unwrap_or_default();
                let due_date = t
                    .due_date
                    .as_deref()
                    .map(|d| params::parse_due_date(d, tz))
                    .transpose()
                    .map_err(|e| field_error(format!("tasks[{i}].due_date"), e))?;
                if let Some(index) = t.milestone.filter(|&idx| idx >= milestone_count) {
                    return Err(PlannerError::invalid_input(format!("tasks[{i}].milestone"))
                        .with_reason(format!(
                            "milestone index {index} out of range ({milestone_count} milestones)"
                        )));
                }
                Ok(TreeTask {
                    title: t.title,
                    description: t.description,
                    priority,
                    estimated_hours: t.estimated_hours,
                    due_date,
                    milestone_index: t.milestone,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PlanTree {
            plan,
            milestones,
            tasks,
        })
    }
}

/// Re-labels a validation error with the generated field's path.
fn field_error(field: String, err: PlannerError) -> PlannerError {
    match err {
        PlannerError::InvalidInput { reason, .. } => {
            PlannerError::invalid_input(field).with_reason(reason)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GeneratedPlan {
        serde_json::from_str(
            r#"{
                "title": "Run a half marathon",
                "description": "Twelve week build",
                "milestones": [
                    {"title": "Base building", "targetDate": "2026-07-01"},
                    {"title": "Race week"}
                ],
                "tasks": [
                    {"title": "Buy shoes", "priority": "high", "milestone": 0},
                    {"title": "Long run", "estimatedHours": 2.0, "milestone": 1},
                    {"title": "Stretch"}
                ],
                "estimatedTimeframe": "12 weeks",
                "tips": ["Sleep well", "Hydrate"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn valid_generated_plan_becomes_a_tree() {
        let tree = sample()
            .validate("Finish a half marathon", None, &TimeZone::UTC)
            .unwrap();
        assert_eq!(tree.plan.title, "Run a half marathon");
        assert_eq!(tree.plan.goal, "Finish a half marathon");
        assert_eq!(tree.plan.timeframe.as_deref(), Some("12 weeks"));
        assert!(tree.plan.description.as_deref().unwrap().contains("- Hydrate"));
        assert_eq!(tree.milestones.len(), 2);
        assert!(tree.milestones[0].target_date.is_some());
        assert_eq!(tree.tasks[0].priority, TaskPriority::High);
        assert_eq!(tree.tasks[2].priority, TaskPriority::Medium);
        assert_eq!(tree.tasks[1].milestone_index, Some(1));
    }

    #[test]
    fn missing_title_is_rejected() {
        let mut plan = sample();
        plan.title = String::new();
        let err = plan.validate("goal", None, &TimeZone::UTC).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidInput { ref field, .. } if field == "title"));
    }

    #[test]
    fn bad_task_fields_name_the_path() {
        let mut plan = sample();
        plan.tasks[1].priority = Some("asap".into());
        let err = plan.validate("goal", None, &TimeZone::UTC).unwrap_err();
        assert!(
            matches!(err, PlannerError::InvalidInput { ref field, .. } if field == "tasks[1].priority")
        );

        let mut plan = sample();
        plan.tasks[2].milestone = Some(5);
        let err = plan.validate("goal", None, &TimeZone::UTC).unwrap_err();
        assert!(
            matches!(err, PlannerError::InvalidInput { ref field, .. } if field == "tasks[2].milestone")
        );
    }

    #[test]
    fn caller_timeframe_fills_gap() {
        let mut plan = sample();
        plan.estimated_timeframe = Some("  ".into());
        let tree = plan
            .validate("goal", Some("3 months"), &TimeZone::UTC)
            .unwrap();
        assert_eq!(tree.plan.timeframe.as_deref(), Some("3 months"));
    }
}
