//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// A selector could not be parsed
    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Two stage nodes share the same id
    #[error("Duplicate node id: #{0}")]
    DuplicateId(String),

    /// A stage node names a parent that does not exist (yet)
    #[error("Unknown parent id: #{0}")]
    UnknownParent(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
