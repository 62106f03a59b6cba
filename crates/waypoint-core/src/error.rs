//! Error types for the planner library.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Comprehensive error type for all planner operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// The store could not serve the request in time (busy, locked)
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },
    /// Entity not found for the given ID
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Status value outside the entity's enum
    #[error("Invalid {entity} status: '{value}'")]
    InvalidStatus { entity: &'static str, value: String },
    /// Status change rejected by the strict transition policy
    #[error("Illegal {entity} transition: {from} -> {to}")]
    IllegalTransition {
        entity: &'static str,
        from: String,
        to: String,
    },
    /// A task cannot depend on itself
    #[error("Task {task_id} cannot depend on itself")]
    SelfDependency { task_id: u64 },
    /// The requested edge would close a cycle in the dependency graph
    #[error("Dependency {dependent_id} -> {prerequisite_id} would create a cycle")]
    CycleDetected {
        dependent_id: u64,
        prerequisite_id: u64,
    },
    /// Both endpoints of a dependency must belong to the same plan
    #[error("Tasks {dependent_id} and {prerequisite_id} belong to different plans")]
    CrossPlanDependency {
        dependent_id: u64,
        prerequisite_id: u64,
    },
    /// The plan generator failed (network, parse, ...)
    #[error("Plan generation failed: {reason}")]
    GenerationFailed { reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    ///
    /// Busy and locked results become [`PlannerError::StoreUnavailable`] so
    /// callers can tell a transient store condition from a real failure.
    pub fn with_source(self, source: rusqlite::Error) -> PlannerError {
        match source.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
                PlannerError::StoreUnavailable {
                    message: format!("{}: {}", self.message, source),
                }
            }
            _ => PlannerError::Database {
                message: self.message,
                source,
            },
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlannerError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Shorthand for [`PlannerError::NotFound`].
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Whether the error is a validation failure the caller can correct.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::InvalidStatus { .. }
                | Self::IllegalTransition { .. }
                | Self::SelfDependency { .. }
                | Self::CycleDetected { .. }
                | Self::CrossPlanDependency { .. }
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlannerError::database(message).with_source(e))
    }
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_database_maps_to_store_unavailable() {
        let source = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        let err = PlannerError::database("Failed to insert task").with_source(source);
        assert!(matches!(err, PlannerError::StoreUnavailable { .. }));
    }

    #[test]
    fn other_database_errors_keep_their_source() {
        let err = PlannerError::database("Failed to query plan")
            .with_source(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, PlannerError::Database { .. }));
        assert_eq!(err.to_string(), "Database error: Failed to query plan");
    }

    #[test]
    fn graph_errors_are_validation_errors() {
        let err = PlannerError::CycleDetected {
            dependent_id: 1,
            prerequisite_id: 2,
        };
        assert!(err.is_validation());
        assert!(!PlannerError::GenerationFailed {
            reason: "timeout".into()
        }
        .is_validation());
    }
}
