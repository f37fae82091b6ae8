//! Inbound platform events
//!
//! The platform adapter translates SDK callbacks into these typed messages
//! and pushes them into the dispatcher. Everything carrying a community id
//! is routed through that community's worker, which preserves per-community
//! ordering.

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use warden_core::{CommunityId, MemberId};

/// The one recognized slash command
pub const AFKLIST_COMMAND: &str = "afklist";

/// A typed event delivered by the platform adapter
#[derive(Debug)]
pub enum PlatformEvent {
    /// Startup: the platform session is live and these communities are known
    Ready { communities: Vec<CommunityId> },

    /// The automation was added to a new community
    CommunityJoined { community: CommunityId },

    /// A member joined a community
    MemberJoined {
        community: CommunityId,
        member: MemberId,
        tag: String,
        joined_at: DateTime<Utc>,
    },

    /// A member left (or was removed from) a community
    MemberLeft {
        community: CommunityId,
        member: MemberId,
    },

    /// A message was sent in a community
    ///
    /// `from_self` marks messages authored by the automation itself, which
    /// handlers must ignore.
    MessageSent {
        community: CommunityId,
        author: MemberId,
        from_self: bool,
        sent_at: DateTime<Utc>,
    },

    /// A slash command was invoked; reply chunks go back over `reply`
    CommandInvoked {
        community: CommunityId,
        name: String,
        reply: oneshot::Sender<Vec<String>>,
    },
}

impl PlatformEvent {
    /// The community this event should be routed by, if any
    ///
    /// `Ready` spans all communities and is handled by the dispatcher
    /// itself rather than a worker.
    pub fn community(&self) -> Option<&CommunityId> {
        match self {
            Self::Ready { .. } => None,
            Self::CommunityJoined { community }
            | Self::MemberJoined { community, .. }
            | Self::MemberLeft { community, .. }
            | Self::MessageSent { community, .. }
            | Self::CommandInvoked { community, .. } => Some(community),
        }
    }

    /// Short event name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "ready",
            Self::CommunityJoined { .. } => "community_joined",
            Self::MemberJoined { .. } => "member_joined",
            Self::MemberLeft { .. } => "member_left",
            Self::MessageSent { .. } => "message_sent",
            Self::CommandInvoked { .. } => "command_invoked",
        }
    }
}
