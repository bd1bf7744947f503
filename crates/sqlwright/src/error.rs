//! Error types for sqlwright

use thiserror::Error;

/// Result type alias for builder and execution operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised by the builder, the compiler, or a database backend
#[derive(Debug, Error)]
pub enum SqlError {
    /// A builder call combined clauses that cannot coexist
    #[error("construction error: {0}")]
    Construction(String),

    /// The builder was compiled or executed in an unusable state
    #[error("invalid builder state: {0}")]
    State(String),

    /// Execution failure reported by the database backend, passed through
    #[error("database error: {0}")]
    Database(String),

    /// Row decode/mapping error
    #[error("decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl SqlError {
    /// Create a construction error
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a construction error
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction(_))
    }

    /// Check if this is a state error
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State(_))
    }
}
