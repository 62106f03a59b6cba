//! Resource model: reference material attached to a plan.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A link, document or tool a plan refers to. Owned by its plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: u64,
    pub plan_id: u64,
    pub title: String,
    pub url: Option<String>,
    /// Free-form category ("article", "course", "tool", ...)
    pub kind: Option<String>,
    pub created_at: Timestamp,
}
