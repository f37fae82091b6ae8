//! Service layer error types
//!
//! One error type for every service operation. Nothing here crashes the
//! process: callers contain failures at community or member granularity and
//! the next scheduled event or sweep is the retry mechanism.

use thiserror::Error;

use warden_core::{DomainError, PlatformError};
use warden_store::StoreError;

/// Service layer error type
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Check whether the platform rejected a privileged operation
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Platform(e) => e.is_permission_denied(),
            Self::Domain(DomainError::Platform(e)) => e.is_permission_denied(),
            _ => false,
        }
    }

    /// Check whether the failure is transient and worth retrying next cycle
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Platform(e) => e.is_transient(),
            Self::Domain(DomainError::Platform(e)) => e.is_transient(),
            _ => false,
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
