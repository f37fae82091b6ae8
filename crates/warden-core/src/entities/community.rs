//! Community record - the durable per-community document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{CommunityId, MemberId};

use super::member::MemberRecord;

/// A provisioned platform resource (role, category, or channel)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceRef {
    pub id: String,
    pub name: String,
}

impl ResourceRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The moderation role, category, and log channel provisioned for a community
///
/// Held as one unit so the record is either fully provisioned or not at all;
/// a partially initialized triple cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvisionedResources {
    pub role: ResourceRef,
    pub category: ResourceRef,
    pub channel: ResourceRef,
}

/// Durable record of a community and its tracked members
///
/// Member order is discovery order and carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommunityRecord {
    pub id: CommunityId,
    pub name: String,
    pub resources: Option<ProvisionedResources>,
    pub members: Vec<MemberRecord>,
}

impl CommunityRecord {
    /// Create an unprovisioned record with no tracked members
    pub fn new(id: CommunityId, name: String) -> Self {
        Self {
            id,
            name,
            resources: None,
            members: Vec::new(),
        }
    }

    /// Check whether moderation resources have been provisioned
    #[inline]
    pub fn is_provisioned(&self) -> bool {
        self.resources.is_some()
    }

    /// Look up a member by id
    pub fn member(&self, id: &MemberId) -> Option<&MemberRecord> {
        self.members.iter().find(|m| &m.id == id)
    }

    /// Look up a member by id, mutably
    pub fn member_mut(&mut self, id: &MemberId) -> Option<&mut MemberRecord> {
        self.members.iter_mut().find(|m| &m.id == id)
    }

    /// Append a member unless one with the same id is already tracked
    ///
    /// Returns false if the member was already present.
    pub fn add_member(&mut self, member: MemberRecord) -> bool {
        if self.member(&member.id).is_some() {
            return false;
        }
        self.members.push(member);
        true
    }

    /// Remove a member by id, returning whether one was removed
    pub fn remove_member(&mut self, id: &MemberId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| &m.id != id);
        self.members.len() != before
    }

    /// Update a member's last-activity timestamp
    ///
    /// Returns false if the member is not tracked; the caller decides
    /// whether that is an inconsistency worth logging.
    pub fn record_message(&mut self, id: &MemberId, at: DateTime<Utc>) -> bool {
        match self.member_mut(id) {
            Some(member) => {
                member.mark_active(at);
                true
            }
            None => false,
        }
    }
}
