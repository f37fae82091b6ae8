//! Platform client port
//!
//! The engine never talks to a chat platform SDK directly. Everything it
//! needs from the platform is behind this trait; the domain layer defines
//! what it needs and an adapter crate (or a test fake) provides the
//! implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{ResourceRef, RoleRef};
use crate::error::PlatformError;
use crate::value_objects::{CommunityId, MemberId};

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Permissions referenced by moderation overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ViewChannel,
    SendMessages,
    ReadMessageHistory,
}

/// Target of a permission overwrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverwriteTarget {
    /// The implicit everyone-role
    Everyone,
    /// A specific role by id
    Role(String),
}

/// One entry of a permission overlay on a channel or category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionOverwrite {
    pub target: OverwriteTarget,
    pub allow: Vec<Permission>,
    pub deny: Vec<Permission>,
}

impl PermissionOverwrite {
    /// Deny the given permissions for the everyone-role
    pub fn deny_everyone(deny: Vec<Permission>) -> Self {
        Self {
            target: OverwriteTarget::Everyone,
            allow: Vec::new(),
            deny,
        }
    }

    /// Allow the given permissions for a specific role
    pub fn allow_role(role_id: impl Into<String>, allow: Vec<Permission>) -> Self {
        Self {
            target: OverwriteTarget::Role(role_id.into()),
            allow,
            deny: Vec::new(),
        }
    }
}

/// A text channel as seen on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

/// Live member data fetched from the platform
///
/// `last_message_at` is whatever the platform still remembers; it may be
/// absent for members who spoke before the current session started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformMember {
    pub id: MemberId,
    pub tag: String,
    pub joined_at: DateTime<Utc>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub roles: Vec<RoleRef>,
    pub is_owner: bool,
}

/// Outbound operations the engine invokes on the chat platform
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Enumerate every community the automation currently operates in
    async fn list_communities(&self) -> PlatformResult<Vec<CommunityId>>;

    /// Display name of a community
    async fn community_name(&self, community: &CommunityId) -> PlatformResult<String>;

    /// Owner of a community
    async fn owner_id(&self, community: &CommunityId) -> PlatformResult<MemberId>;

    /// Fetch the full live membership of a community
    async fn fetch_members(&self, community: &CommunityId) -> PlatformResult<Vec<PlatformMember>>;

    /// Find a role by exact name
    async fn find_role(
        &self,
        community: &CommunityId,
        name: &str,
    ) -> PlatformResult<Option<ResourceRef>>;

    /// Create a role
    async fn create_role(&self, community: &CommunityId, name: &str) -> PlatformResult<ResourceRef>;

    /// Find a category channel by exact name
    async fn find_category(
        &self,
        community: &CommunityId,
        name: &str,
    ) -> PlatformResult<Option<ResourceRef>>;

    /// Create a category channel
    async fn create_category(
        &self,
        community: &CommunityId,
        name: &str,
    ) -> PlatformResult<ResourceRef>;

    /// Find a text channel by exact (already normalized) name
    async fn find_text_channel(
        &self,
        community: &CommunityId,
        name: &str,
    ) -> PlatformResult<Option<ChannelRef>>;

    /// Create a text channel under a category with a permission overlay
    async fn create_text_channel(
        &self,
        community: &CommunityId,
        name: &str,
        parent_id: &str,
        overwrites: &[PermissionOverwrite],
    ) -> PlatformResult<ChannelRef>;

    /// Move an existing channel under a category
    async fn set_channel_parent(
        &self,
        community: &CommunityId,
        channel_id: &str,
        parent_id: &str,
    ) -> PlatformResult<()>;

    /// Replace the permission overlay on a category
    async fn apply_category_overwrites(
        &self,
        community: &CommunityId,
        category_id: &str,
        overwrites: &[PermissionOverwrite],
    ) -> PlatformResult<()>;

    /// Replace all of a member's roles with exactly the given set
    async fn replace_member_roles(
        &self,
        community: &CommunityId,
        member: &MemberId,
        role_ids: &[String],
    ) -> PlatformResult<()>;

    /// Post a message to a channel
    async fn send_message(
        &self,
        community: &CommunityId,
        channel_id: &str,
        content: &str,
    ) -> PlatformResult<()>;

    /// Remove (kick) a member from a community
    async fn remove_member(&self, community: &CommunityId, member: &MemberId)
        -> PlatformResult<()>;
}
