//! Activity ledger
//!
//! Tracks each member's last observed activity. Platform events mutate the
//! persisted member sequence; `load_members` merges live membership with
//! persisted history because the platform forgets last-message timestamps
//! across restarts and the store has to backfill them.
//!
//! Event handlers here are deliberately forgiving: an event referencing an
//! unknown community or member is a log-only inconsistency that the next
//! full reconciliation repairs.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use warden_core::{CommunityId, MemberId, MemberRecord};
use warden_store::CommunityPatch;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Activity ledger
pub struct ActivityLedger<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ActivityLedger<'a> {
    /// Create a new ActivityLedger
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load the current member sequence for a community
    ///
    /// Fetches live membership and backfills `last_message_at` from the
    /// persisted record wherever the platform no longer remembers it.
    #[instrument(skip(self))]
    pub async fn load_members(&self, community: &CommunityId) -> ServiceResult<Vec<MemberRecord>> {
        let live = self.ctx.platform().fetch_members(community).await?;
        let persisted = self
            .ctx
            .communities()
            .get(community)
            .await?
            .map(|record| record.members)
            .unwrap_or_default();

        let members = live
            .into_iter()
            .map(|member| {
                let stored = persisted.iter().find(|m| m.id == member.id);
                let last_message_at = member
                    .last_message_at
                    .or_else(|| stored.and_then(|m| m.last_message_at));
                MemberRecord {
                    id: member.id,
                    tag: member.tag,
                    joined_at: member.joined_at,
                    last_message_at,
                    roles: member.roles,
                    is_owner: member.is_owner,
                }
            })
            .collect();

        Ok(members)
    }

    /// Record a message sent by a member
    ///
    /// Unknown senders are not added here; recovery happens at the next
    /// full reconciliation.
    #[instrument(skip(self))]
    pub async fn record_message(
        &self,
        community: &CommunityId,
        member: &MemberId,
        at: DateTime<Utc>,
    ) -> ServiceResult<()> {
        let Some(mut record) = self.ctx.communities().get(community).await? else {
            warn!(community_id = %community, "Message for untracked community, awaiting reconciliation");
            return Ok(());
        };

        if !record.record_message(member, at) {
            warn!(
                community_id = %community,
                member_id = %member,
                "Message from untracked member, awaiting reconciliation"
            );
            return Ok(());
        }

        self.persist_members(community, record.members).await?;
        debug!(community_id = %community, member_id = %member, "Last activity updated");
        Ok(())
    }

    /// Record a member joining a community
    #[instrument(skip(self, tag))]
    pub async fn record_join(
        &self,
        community: &CommunityId,
        member: MemberId,
        tag: String,
        joined_at: DateTime<Utc>,
    ) -> ServiceResult<()> {
        let Some(mut record) = self.ctx.communities().get(community).await? else {
            warn!(community_id = %community, "Join event for untracked community, awaiting reconciliation");
            return Ok(());
        };

        let owner = self.ctx.platform().owner_id(community).await?;
        let is_owner = member == owner;
        let new_member = MemberRecord::joined(member.clone(), tag, joined_at, is_owner);

        if !record.add_member(new_member) {
            debug!(community_id = %community, member_id = %member, "Joining member already tracked");
            return Ok(());
        }

        self.persist_members(community, record.members).await?;
        info!(community_id = %community, member_id = %member, "Member added to ledger");
        Ok(())
    }

    /// Record a member leaving a community
    #[instrument(skip(self))]
    pub async fn record_leave(
        &self,
        community: &CommunityId,
        member: &MemberId,
    ) -> ServiceResult<()> {
        let Some(mut record) = self.ctx.communities().get(community).await? else {
            warn!(community_id = %community, "Leave event for untracked community, awaiting reconciliation");
            return Ok(());
        };

        if !record.remove_member(member) {
            debug!(community_id = %community, member_id = %member, "Leaving member was not tracked");
            return Ok(());
        }

        self.persist_members(community, record.members).await?;
        info!(community_id = %community, member_id = %member, "Member removed from ledger");
        Ok(())
    }

    async fn persist_members(
        &self,
        community: &CommunityId,
        members: Vec<MemberRecord>,
    ) -> ServiceResult<()> {
        let updated = self
            .ctx
            .communities()
            .patch(community, CommunityPatch::members(members))
            .await?;
        if !updated {
            // Record vanished between read and write; reconciliation heals it.
            warn!(community_id = %community, "Member patch hit a missing record");
        }
        Ok(())
    }
}
