//! Display wrappers and markdown formatting for Waypoint output.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]).
//! This module adds newtype wrappers for collections and for the outcome of
//! create, update and delete operations, so the CLI can print any result with
//! a single `format!`.
//!
//! ```text
//! ┌──────────────────┐    ┌───────────────────┐    ┌─────────────────┐
//! │  Domain Models   │    │ Collection &      │    │    Markdown     │
//! │ (Plan, Task, ..) │───▶│ Result Wrappers   │───▶│     Output      │
//! └──────────────────┘    └───────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: `PlanSummaries`, `Tasks`, `Milestones`, `Resources`,
//!   `Notifications`
//! - [`results`]: `CreateResult`, `UpdateResult`, `DeleteResult`
//! - [`status`]: `OperationStatus` confirmation lines
//! - [`datetime`]: timestamp formatting in the local time zone
//! - [`models`]: Display impls for the domain models
//!
//! # Examples
//!
//! ```rust
//! use waypoint_core::display::OperationStatus;
//!
//! let done = OperationStatus::success("Marked 3 notifications read".to_string());
//! assert_eq!(done.to_string(), "Success: Marked 3 notifications read\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Milestones, Notifications, PlanSummaries, Resources, Tasks};
pub use datetime::{LocalDate, LocalDateTime};
pub use results::{CreateResult, DeleteResult, EntityLabel, UpdateResult};
pub use status::OperationStatus;
