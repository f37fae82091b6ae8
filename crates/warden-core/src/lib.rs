//! # warden-core
//!
//! Domain layer containing entities, value objects, and the platform port trait.
//! This crate has zero dependencies on infrastructure (storage, event plumbing, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{CommunityRecord, MemberRecord, ProvisionedResources, ResourceRef, RoleRef};
pub use error::{DomainError, PlatformError};
pub use traits::{
    ChannelRef, OverwriteTarget, Permission, PermissionOverwrite, PlatformClient, PlatformMember,
    PlatformResult,
};
pub use value_objects::{
    channel_slug, format_afk_duration, CommunityId, Inactivity, InactivityTier, MemberId,
    TierThresholds,
};
