//! Result wrapper types for displaying operation outcomes.
//!
//! Create, update and delete operations print a one-line confirmation naming
//! the entity kind and id, followed by the entity itself where it helps.

use std::fmt;

use crate::models::{Milestone, Plan, Resource, Task, TaskDependency};

/// Human name of an entity kind in confirmation messages.
pub trait EntityLabel {
    const LABEL: &'static str;

    fn id(&self) -> u64;

    fn title(&self) -> &str;
}

macro_rules! entity_label {
    ($($ty:ty => $label:literal),* $(,)?) => {
        $(
            impl EntityLabel for $ty {
                const LABEL: &'static str = $label;

                fn id(&self) -> u64 {
                    self.id
                }

                fn title(&self) -> &str {
                    &self.title
                }
            }
        )*
    };
}

entity_label!(
    Plan => "plan",
    Milestone => "milestone",
    Task => "task",
    Resource => "resource",
);

/// Result of a create operation.
///
/// # Examples
///
/// ```rust
/// use waypoint_core::{
///     display::CreateResult,
///     models::{Plan, PlanStatus},
/// };
/// use jiff::Timestamp;
///
/// let plan = Plan {
///     id: 1,
///     title: "New Project".to_string(),
///     description: None,
///     goal: "Launch".to_string(),
///     timeframe: None,
///     status: PlanStatus::Active,
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
/// };
///
/// let output = CreateResult::new(plan).to_string();
/// assert!(output.starts_with("Created plan with ID: 1"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl<T: EntityLabel + fmt::Display> fmt::Display for CreateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created {} with ID: {}", T::LABEL, self.resource.id())?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<TaskDependency> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Task {} now depends on task {}",
            self.resource.dependent_id, self.resource.prerequisite_id
        )
    }
}

/// Result of an update operation, optionally listing what changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl<T: EntityLabel + fmt::Display> fmt::Display for UpdateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated {} with ID: {}", T::LABEL, self.resource.id())?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Result of a delete operation.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl<T: EntityLabel> fmt::Display for DeleteResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted {} '{}' (ID: {})",
            T::LABEL,
            self.resource.title(),
            self.resource.id()
        )
    }
}

impl fmt::Display for DeleteResult<TaskDependency> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Task {} no longer depends on task {}",
            self.resource.dependent_id, self.resource.prerequisite_id
        )
    }
}
