//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{CommunityId, MemberId};

use super::platform_error::PlatformError;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Community not found: {0}")]
    CommunityNotFound(CommunityId),

    #[error("Member {member} not found in community {community}")]
    MemberNotFound {
        community: CommunityId,
        member: MemberId,
    },

    // =========================================================================
    // State Errors
    // =========================================================================
    #[error("Community {0} has no provisioned moderation resources")]
    NotProvisioned(CommunityId),

    #[error("Invalid tier thresholds: {0}")]
    InvalidThresholds(String),

    // =========================================================================
    // Consistency Errors
    // =========================================================================
    #[error("Data inconsistency: {0}")]
    DataInconsistency(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl DomainError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CommunityNotFound(_) | Self::MemberNotFound { .. }
        )
    }

    /// Check if this is a self-healing inconsistency (recovered at the next
    /// full reconciliation rather than retried now)
    pub fn is_inconsistency(&self) -> bool {
        matches!(self, Self::DataInconsistency(_))
    }
}
