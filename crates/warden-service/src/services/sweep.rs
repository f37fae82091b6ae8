//! Inactivity sweep
//!
//! The periodic walk over every community that classifies each member into
//! an inactivity tier and performs the tier's side effect. Tiers are
//! recomputed from timestamps on every sweep; no "already warned" state is
//! stored. With the default `repeat_warnings` policy a member sitting in a
//! tier is re-notified every cycle until they speak or escalate; turning
//! the policy off suppresses repeats in-process until the tier changes.
//!
//! Failures are contained: a failing member is skipped for the cycle, a
//! failing community is skipped for the cycle, and the next sweep retries.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use warden_core::{
    CommunityId, DomainError, InactivityTier, MemberId, MemberRecord, ProvisionedResources,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::ledger::ActivityLedger;

/// Inactivity sweep engine
///
/// One instance lives for the whole process so the repeat-warning memo
/// survives across cycles.
pub struct InactivitySweep {
    ctx: ServiceContext,
    notified: DashMap<(CommunityId, MemberId), InactivityTier>,
}

impl InactivitySweep {
    /// Create a new InactivitySweep
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            ctx,
            notified: DashMap::new(),
        }
    }

    /// Sweep every known community, isolating per-community failures
    ///
    /// Returns how many communities were swept successfully.
    #[instrument(skip(self))]
    pub async fn sweep_all(&self) -> usize {
        let communities = match self.ctx.platform().list_communities().await {
            Ok(communities) => communities,
            Err(err) => {
                warn!(error = %err, "Could not enumerate communities, skipping sweep cycle");
                return 0;
            }
        };

        let mut swept = 0;
        for community in communities {
            match self.sweep_community(&community).await {
                Ok(()) => swept += 1,
                Err(err) => {
                    warn!(
                        community_id = %community,
                        error = %err,
                        "Community sweep failed, retrying next cycle"
                    );
                }
            }
        }

        info!(swept, "Sweep cycle finished");
        swept
    }

    /// Sweep one community
    ///
    /// Member-level side effects run concurrently, bounded by the
    /// configured limit so platform rate limits are respected. A failing
    /// member is logged and skipped, never aborting the rest.
    #[instrument(skip(self))]
    pub async fn sweep_community(&self, community: &CommunityId) -> ServiceResult<()> {
        let record = self
            .ctx
            .communities()
            .get(community)
            .await?
            .ok_or_else(|| DomainError::CommunityNotFound(community.clone()))?;
        let resources = record
            .resources
            .ok_or_else(|| DomainError::NotProvisioned(community.clone()))?;

        let members = ActivityLedger::new(&self.ctx).load_members(community).await?;
        let now = Utc::now();
        let limit = self.ctx.sweep().concurrency.max(1);

        stream::iter(members)
            .for_each_concurrent(limit, |member| {
                let resources = &resources;
                async move {
                    if let Err(err) = self.sweep_member(community, resources, &member, now).await {
                        warn!(
                            community_id = %community,
                            member_id = %member.id,
                            error = %err,
                            "Member sweep failed, skipping this cycle"
                        );
                    }
                }
            })
            .await;

        Ok(())
    }

    async fn sweep_member(
        &self,
        community: &CommunityId,
        resources: &ProvisionedResources,
        member: &MemberRecord,
        now: DateTime<Utc>,
    ) -> ServiceResult<()> {
        let sweep = self.ctx.sweep();
        let inactivity = member.inactivity(now);
        let tier = InactivityTier::classify(inactivity, &sweep.thresholds);
        debug!(
            community_id = %community,
            member_id = %member.id,
            ?inactivity,
            ?tier,
            "Member classified"
        );

        let memo_key = (community.clone(), member.id.clone());
        if tier == InactivityTier::Active {
            // Activity resets the suppression memo so a later relapse
            // notifies again.
            self.notified.remove(&memo_key);
            return Ok(());
        }

        if !sweep.repeat_warnings {
            let already = self.notified.get(&memo_key).map(|entry| *entry.value());
            if already == Some(tier) {
                return Ok(());
            }
        }

        let platform = self.ctx.platform();
        let channel_id = resources.channel.id.as_str();
        match tier {
            InactivityTier::Active => unreachable!("handled above"),
            InactivityTier::Warned => {
                // Demote: drop every role the member holds and grant
                // exactly the moderation role.
                platform
                    .replace_member_roles(community, &member.id, &[resources.role.id.clone()])
                    .await?;
                platform
                    .send_message(
                        community,
                        channel_id,
                        &format!(
                            "🚨 Warning 🚨: {}, you have been AFK for over {} days. Moved to the {} role.",
                            member.tag, sweep.thresholds.warn_after, resources.role.name
                        ),
                    )
                    .await?;
                info!(community_id = %community, member_id = %member.id, "Member demoted and warned");
            }
            InactivityTier::FinalWarned => {
                platform
                    .send_message(
                        community,
                        channel_id,
                        &format!(
                            "⚠️ Second warning: {}, you have been AFK for more than {} days. Show some activity or you will be removed.",
                            member.tag, sweep.thresholds.final_warn_after
                        ),
                    )
                    .await?;
            }
            InactivityTier::LastChance => {
                platform
                    .send_message(
                        community,
                        channel_id,
                        &format!(
                            "⚠️ Last warning: {}, you have been AFK for over {} days. This is the final warning before removal.",
                            member.tag, sweep.thresholds.last_chance_after
                        ),
                    )
                    .await?;
            }
            InactivityTier::Removable => {
                if member.is_owner {
                    info!(
                        community_id = %community,
                        member_id = %member.id,
                        "Owner is past the removal threshold, skipped"
                    );
                    return Ok(());
                }

                platform
                    .send_message(
                        community,
                        channel_id,
                        &format!(
                            "❌ Removed ❌: {} has been removed for being AFK for more than {} days.",
                            member.tag, sweep.thresholds.remove_after
                        ),
                    )
                    .await?;

                if sweep.actually_remove {
                    platform.remove_member(community, &member.id).await?;
                    info!(community_id = %community, member_id = %member.id, "Member removed for inactivity");
                } else {
                    // Deployment choice: announce without kicking.
                    debug!(community_id = %community, member_id = %member.id, "Removal disabled, notice posted only");
                }
            }
        }

        self.notified.insert(memo_key, tier);
        Ok(())
    }
}
