use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The acting user is not allowed to perform the operation
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// A record is missing configuration the operation needs
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from date and timezone operations
    #[error("Date error: {0}")]
    Date(String),

    /// Error from working-time schedule operations
    #[error("Schedule error: {0}")]
    Schedule(String),

    /// Runtime error for unexpected situations
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl ComputeError {
    /// Whether the error is a permission failure rather than a fault.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ComputeError::AccessDenied(_))
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
