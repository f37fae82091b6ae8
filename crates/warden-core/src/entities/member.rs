//! Member record - per-member activity snapshot inside a community record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Inactivity, MemberId};

/// A role held by a member, excluding the implicit everyone-role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleRef {
    pub id: String,
    pub name: String,
}

impl RoleRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Tracked member of a community
///
/// `last_message_at` absent means the member has never been observed
/// speaking since tracking began.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberRecord {
    pub id: MemberId,
    pub tag: String,
    pub joined_at: DateTime<Utc>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub roles: Vec<RoleRef>,
    pub is_owner: bool,
}

impl MemberRecord {
    /// Create a freshly joined member with no observed activity
    pub fn joined(id: MemberId, tag: String, joined_at: DateTime<Utc>, is_owner: bool) -> Self {
        Self {
            id,
            tag,
            joined_at,
            last_message_at: None,
            roles: Vec::new(),
            is_owner,
        }
    }

    /// Check whether the member has ever been observed sending a message
    #[inline]
    pub fn never_spoke(&self) -> bool {
        self.last_message_at.is_none()
    }

    /// Record a message sent at the given time
    pub fn mark_active(&mut self, at: DateTime<Utc>) {
        self.last_message_at = Some(at);
    }

    /// Elapsed inactivity as of `now`
    pub fn inactivity(&self, now: DateTime<Utc>) -> Inactivity {
        Inactivity::since(now, self.last_message_at)
    }
}
