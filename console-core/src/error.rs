//! Error types for console operations

use crate::ResourceKind;
use thiserror::Error;

/// Master error type for every controller and gateway operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("Network failure: {reason}")]
    NetworkFailure { reason: String },

    #[error("Session is not authorized")]
    Unauthorized,

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    #[error("{member} is already a member of {namespace}")]
    AlreadyMember { member: String, namespace: String },

    #[error("Validation required for {field}: {reason}")]
    ValidationRequired { field: String, reason: String },

    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },
}

impl ConsoleError {
    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: kind.label().to_string(),
            id: id.into(),
        }
    }

    /// A member missing from a namespace's membership set.
    pub fn member_not_found(member_id: impl Into<String>, namespace: &str) -> Self {
        Self::NotFound {
            entity: format!("Member of {namespace}"),
            id: member_id.into(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationRequired {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn network(reason: impl Into<String>) -> Self {
        Self::NetworkFailure {
            reason: reason.into(),
        }
    }

    /// Errors that terminate the session rather than the single operation.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, ConsoleError::Unauthorized)
    }

    /// Errors the user may resolve by issuing the same action again.
    pub fn is_retryable(&self) -> bool {
        match self {
            ConsoleError::NetworkFailure { .. } | ConsoleError::InvalidResponse { .. } => true,
            ConsoleError::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
