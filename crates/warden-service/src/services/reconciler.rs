//! Resource reconciler
//!
//! Ensures a moderation role, category, and log channel exist per community,
//! idempotently: every step is find-or-create, and the category permission
//! overlay is re-applied on every pass so external drift gets corrected.
//!
//! On any platform failure the whole reconciliation aborts and nothing is
//! persisted; a community record never carries a partial resource triple.

use tracing::{info, instrument};

use warden_core::{
    channel_slug, CommunityId, CommunityRecord, Permission, PermissionOverwrite,
    ProvisionedResources, ResourceRef,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::ledger::ActivityLedger;

/// Resource reconciler
pub struct ResourceReconciler<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ResourceReconciler<'a> {
    /// Create a new ResourceReconciler
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve (creating where necessary) the moderation role, category,
    /// and log channel of a community
    #[instrument(skip(self))]
    pub async fn reconcile(&self, community: &CommunityId) -> ServiceResult<ProvisionedResources> {
        let names = self.ctx.moderation();
        let channel_name = channel_slug(&names.channel_name);
        let platform = self.ctx.platform();

        let role = match platform.find_role(community, &names.role_name).await? {
            Some(role) => role,
            None => {
                let role = platform.create_role(community, &names.role_name).await?;
                info!(community_id = %community, role = %role.name, "Moderation role created");
                role
            }
        };

        let category = match platform.find_category(community, &names.category_name).await? {
            Some(category) => category,
            None => {
                let category = platform
                    .create_category(community, &names.category_name)
                    .await?;
                info!(community_id = %community, category = %category.name, "Moderation category created");
                category
            }
        };

        let channel = match platform.find_text_channel(community, &channel_name).await? {
            Some(channel) => {
                if channel.parent_id.as_deref() != Some(category.id.as_str()) {
                    platform
                        .set_channel_parent(community, &channel.id, &category.id)
                        .await?;
                    info!(community_id = %community, channel = %channel.name, "Log channel reparented under moderation category");
                }
                ResourceRef::new(channel.id, channel.name)
            }
            None => {
                let channel = platform
                    .create_text_channel(
                        community,
                        &channel_name,
                        &category.id,
                        &channel_overwrites(&role.id),
                    )
                    .await?;
                info!(community_id = %community, channel = %channel.name, "Log channel created");
                ResourceRef::new(channel.id, channel.name)
            }
        };

        // Re-applied even when everything pre-existed, so externally altered
        // overlays are healed on the next reconciliation.
        platform
            .apply_category_overwrites(community, &category.id, &category_overwrites(&role.id))
            .await?;

        Ok(ProvisionedResources {
            role,
            category,
            channel,
        })
    }

    /// Reconcile a community and persist one complete record for it
    ///
    /// Runs at startup for every known community and when the automation
    /// joins a new one. The member sequence is seeded from live membership
    /// (backfilled from any previously persisted record) before saving.
    #[instrument(skip(self))]
    pub async fn provision(&self, community: &CommunityId) -> ServiceResult<CommunityRecord> {
        let resources = self.reconcile(community).await?;
        let name = self.ctx.platform().community_name(community).await?;

        let ledger = ActivityLedger::new(self.ctx);
        let members = ledger.load_members(community).await?;

        let record = CommunityRecord {
            id: community.clone(),
            name,
            resources: Some(resources),
            members,
        };
        self.ctx.communities().upsert(&record).await?;

        info!(
            community_id = %community,
            name = %record.name,
            members = record.members.len(),
            "Community provisioned"
        );
        Ok(record)
    }
}

/// Overlay for the log channel: invisible to everyone, usable by the role
fn channel_overwrites(role_id: &str) -> Vec<PermissionOverwrite> {
    vec![
        PermissionOverwrite::deny_everyone(vec![Permission::ViewChannel]),
        PermissionOverwrite::allow_role(
            role_id,
            vec![Permission::ViewChannel, Permission::SendMessages],
        ),
    ]
}

/// Overlay for the category: also grants history so demoted members can
/// read warnings posted before their demotion
fn category_overwrites(role_id: &str) -> Vec<PermissionOverwrite> {
    vec![
        PermissionOverwrite::deny_everyone(vec![Permission::ViewChannel]),
        PermissionOverwrite::allow_role(
            role_id,
            vec![
                Permission::ViewChannel,
                Permission::SendMessages,
                Permission::ReadMessageHistory,
            ],
        ),
    ]
}
