//! Platform client errors
//!
//! Every failure a `PlatformClient` implementation can report, reduced to
//! the three categories the engine reacts to differently: missing resources
//! trigger the create path, permission failures abort the community's
//! current operation, and transient failures are retried on the next cycle.

use thiserror::Error;

/// Errors reported by the chat platform client
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("Platform resource not found: {0}")]
    NotFound(String),

    #[error("Platform denied a privileged operation: {0}")]
    PermissionDenied(String),

    #[error("Transient platform failure: {0}")]
    Transient(String),
}

impl PlatformError {
    /// Check if this is a missing-resource error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if the platform rejected a privileged operation
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }

    /// Check if the failure is transient (network, rate limit)
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
