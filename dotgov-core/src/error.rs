//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error types
pub use dotgov_registry::{DomainNameError, RegistryError};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Domain not found
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Application not found
    #[error("Application not found: {0}")]
    ApplicationNotFound(String),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// A domain lifecycle operation was attempted from a state that does not allow it
    #[error("Can't switch from state '{current}' to '{target}', must be either {allowed}")]
    InvalidDomainTransition {
        current: String,
        target: String,
        /// Pre-rendered list of allowed source states, e.g. `'dns_needed' or 'on_hold'`
        allowed: String,
    },

    /// The domain is deleted and can no longer be modified
    #[error("Domain {0} is deleted and cannot be modified")]
    DomainDeleted(String),

    /// An application status change was attempted that the review table does not allow
    #[error("Transition from '{from}' to '{to}' is not allowed")]
    InvalidStatusTransition { from: String, to: String },

    /// The linked domain is live, so the approval cannot be reverted
    #[error("This action is not permitted. The domain is already active.")]
    DomainAlreadyActive,

    /// The application's creator has been restricted
    #[error("This action is not permitted for applications with a restricted creator.")]
    RestrictedCreator,

    /// The requested name is taken at the registry
    #[error("Requested domain is not available: {0}")]
    DomainUnavailable(String),

    /// Malformed domain name
    #[error("{0}")]
    InvalidDomainName(#[from] DomainNameError),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Notification dispatch error
    #[error("Notification error: {0}")]
    NotificationError(String),

    /// Registry error (converted from the client library)
    #[error("{0}")]
    Registry(#[from] RegistryError),
}

impl CoreError {
    /// Whether the error is an expected outcome (guarded transition, taken
    /// name, missing record), used for log level selection.
    ///
    /// Level `warn` should be used when this returns `true`, level `error`
    /// otherwise. **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::DomainNotFound(_)
            | Self::ApplicationNotFound(_)
            | Self::UserNotFound(_)
            | Self::InvalidDomainTransition { .. }
            | Self::DomainDeleted(_)
            | Self::InvalidStatusTransition { .. }
            | Self::DomainAlreadyActive
            | Self::RestrictedCreator
            | Self::DomainUnavailable(_)
            | Self::InvalidDomainName(_)
            | Self::ValidationError(_) => true,
            Self::Registry(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
