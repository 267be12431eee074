use crate::types::DbId;

/// Broad classification of a [`CoreError`], used by callers to pick a
/// response without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    Rejected,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Employee {employee_id} is already clocked in")]
    AlreadyActive { employee_id: DbId },

    #[error("No active time entry found for employee {employee_id}")]
    NoActiveEntry { employee_id: DbId },

    #[error("An employee with email '{email}' already exists")]
    DuplicateIdentity { email: String },

    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    /// Authentication failure. Deliberately carries no detail so that an
    /// unknown email, a wrong secret and a deactivated account look alike.
    #[error("Invalid email or password")]
    Rejected,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyActive { .. }
            | Self::NoActiveEntry { .. }
            | Self::DuplicateIdentity { .. } => ErrorKind::Conflict,
            Self::Validation(_) | Self::InvalidAssignment(_) => ErrorKind::InvalidInput,
            Self::Rejected => ErrorKind::Rejected,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for a `Validation` error naming a required field.
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("Missing required field: {field}"))
    }
}
