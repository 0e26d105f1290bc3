//! Database error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violated (duplicate email or phone)
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// Referenced owner record does not exist
    #[error("{entity} does not exist: {id}")]
    MissingParent { entity: &'static str, id: String },

    /// Input rejected before reaching storage
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl DatabaseError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DatabaseError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Classify a write failure against a person-owned table.
    ///
    /// Foreign-key violations become [`DatabaseError::MissingParent`] so the
    /// HTTP layer can answer with a client error instead of a fault.
    pub(crate) fn from_owned_write(err: sqlx::Error, person_id: i64) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::MissingParent {
                    entity: "Person",
                    id: person_id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
