//! Engine integration tests
//!
//! Exercise provisioning, the activity ledger, the inactivity sweep, and
//! the report end to end against the in-memory platform fake.
//!
//! Run with: cargo test -p integration-tests --test engine_tests

use std::sync::Arc;
use std::time::Duration;

use integration_tests::{days_ago, member_afk, member_silent, TestEngine};
use tokio::sync::oneshot;

use warden_common::SweepConfig;
use warden_core::{CommunityId, MemberId, PlatformError};
use warden_gateway::{DispatcherConfig, EventDispatcher, PlatformEvent, AFKLIST_COMMAND};
use warden_service::services::report::{LINES_PER_CHUNK, NO_DATA_REPLY};
use warden_service::{AfkReport, InactivitySweep, ResourceReconciler};

// ============================================================================
// Provisioning Tests
// ============================================================================

#[tokio::test]
async fn test_provision_creates_role_category_and_slugged_channel() {
    let engine = TestEngine::new();
    let community = engine.community(0);

    let record = ResourceReconciler::new(&engine.ctx)
        .provision(&community)
        .await
        .expect("provisioning failed");

    let resources = record.resources.clone().expect("resources missing");
    assert_eq!(resources.role.name, "AFK");
    assert_eq!(resources.category.name, "Warden");
    assert_eq!(resources.channel.name, "warden-log");

    engine.platform.inspect(&community, |c| {
        assert_eq!(c.created_roles, 1);
        assert_eq!(c.created_categories, 1);
        assert_eq!(c.created_channels, 1);
        let channel = &c.channels[0];
        assert_eq!(channel.parent_id.as_deref(), Some(resources.category.id.as_str()));
        assert!(c.category_overwrites.contains_key(&resources.category.id));
    });

    // The persisted record matches what provisioning returned.
    let stored = engine
        .ctx
        .communities()
        .get(&community)
        .await
        .unwrap()
        .expect("record not persisted");
    assert_eq!(stored, record);
    assert_eq!(stored.members.len(), 1);
}

#[tokio::test]
async fn test_provision_is_idempotent() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    let reconciler = ResourceReconciler::new(&engine.ctx);

    let first = reconciler.provision(&community).await.unwrap();
    let second = reconciler.provision(&community).await.unwrap();

    assert_eq!(first.resources, second.resources);
    engine.platform.inspect(&community, |c| {
        assert_eq!(c.created_roles, 1);
        assert_eq!(c.created_categories, 1);
        assert_eq!(c.created_channels, 1);
    });
}

#[tokio::test]
async fn test_provision_adopts_and_reparents_existing_channel() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    engine.platform.add_channel(&community, "warden-log", None);

    let record = ResourceReconciler::new(&engine.ctx)
        .provision(&community)
        .await
        .unwrap();

    let resources = record.resources.unwrap();
    engine.platform.inspect(&community, |c| {
        // Adopted, not recreated, and moved under the category.
        assert_eq!(c.created_channels, 0);
        assert_eq!(
            c.channels[0].parent_id.as_deref(),
            Some(resources.category.id.as_str())
        );
    });
}

#[tokio::test]
async fn test_provision_reapplies_category_overlay_every_pass() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    let reconciler = ResourceReconciler::new(&engine.ctx);

    reconciler.provision(&community).await.unwrap();
    reconciler.provision(&community).await.unwrap();

    assert!(engine.platform.was_invoked("apply_category_overwrites"));
    engine.platform.inspect(&community, |c| {
        let category_id = &c.categories[0].id;
        let overlay = &c.category_overwrites[category_id];
        assert_eq!(overlay.len(), 2);
    });
}

#[tokio::test]
async fn test_provision_failure_persists_nothing() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    engine.platform.fail_on(
        "create_role",
        PlatformError::PermissionDenied("create role".to_string()),
    );

    let err = ResourceReconciler::new(&engine.ctx)
        .provision(&community)
        .await
        .expect_err("provisioning should fail");
    assert!(err.is_permission_denied());

    // No partial record may survive a failed pass.
    let stored = engine.ctx.communities().get(&community).await.unwrap();
    assert!(stored.is_none());

    // After permissions are granted the next pass succeeds.
    engine.platform.heal();
    let record = ResourceReconciler::new(&engine.ctx)
        .provision(&community)
        .await
        .unwrap();
    assert!(record.is_provisioned());
}

// ============================================================================
// Ledger Tests
// ============================================================================

#[tokio::test]
async fn test_ledger_backfills_forgotten_timestamps() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    let member = member_afk("quiet", 10);
    let last_seen = member.last_message_at;
    engine.platform.add_member(&community, member);

    ResourceReconciler::new(&engine.ctx)
        .provision(&community)
        .await
        .unwrap();

    // The platform forgets the timestamp (session restart); the persisted
    // record still remembers it.
    engine
        .platform
        .set_last_message(&community, &MemberId::new("quiet"), None);

    let members = warden_service::ActivityLedger::new(&engine.ctx)
        .load_members(&community)
        .await
        .unwrap();
    let quiet = members
        .iter()
        .find(|m| m.id == MemberId::new("quiet"))
        .unwrap();
    assert_eq!(quiet.last_message_at, last_seen);
}

#[tokio::test]
async fn test_interleaved_activity_loses_no_updates() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    engine.platform.add_member(&community, member_silent("a", 1));
    engine.platform.add_member(&community, member_silent("b", 1));

    ResourceReconciler::new(&engine.ctx)
        .provision(&community)
        .await
        .unwrap();

    let dispatcher = Arc::new(EventDispatcher::new(
        engine.ctx.clone(),
        DispatcherConfig::default(),
    ));
    let events = dispatcher.handle();
    dispatcher.clone().start();

    // Rapidly interleaved activity from two members of the same community.
    // The community worker applies the events one at a time, so neither
    // member's read-modify-write can clobber the other's.
    let at = days_ago(0);
    for _ in 0..20 {
        for id in ["a", "b"] {
            events
                .send(PlatformEvent::MessageSent {
                    community: community.clone(),
                    author: MemberId::new(id),
                    from_self: false,
                    sent_at: at,
                })
                .await
                .unwrap();
        }
    }

    // The report reply drains the queue behind all 40 events.
    let (reply_tx, reply_rx) = oneshot::channel();
    events
        .send(PlatformEvent::CommandInvoked {
            community: community.clone(),
            name: AFKLIST_COMMAND.to_string(),
            reply: reply_tx,
        })
        .await
        .unwrap();
    reply_rx.await.unwrap();

    let record = engine
        .ctx
        .communities()
        .get(&community)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        record.member(&MemberId::new("a")).unwrap().last_message_at,
        Some(at)
    );
    assert_eq!(
        record.member(&MemberId::new("b")).unwrap().last_message_at,
        Some(at)
    );

    dispatcher.stop();
}

// ============================================================================
// Sweep Tests
// ============================================================================

async fn provisioned_sweep(engine: &TestEngine, community: &CommunityId) -> InactivitySweep {
    ResourceReconciler::new(&engine.ctx)
        .provision(community)
        .await
        .unwrap();
    InactivitySweep::new(engine.ctx.clone())
}

#[tokio::test]
async fn test_sweep_leaves_active_members_alone() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    engine.platform.add_member(&community, member_afk("busy", 5));

    let sweep = provisioned_sweep(&engine, &community).await;
    sweep.sweep_community(&community).await.unwrap();

    assert!(engine.platform.messages(&community).is_empty());
    engine.platform.inspect(&community, |c| {
        assert!(c.role_replacements.is_empty());
        assert!(c.kicked.is_empty());
    });
}

#[tokio::test]
async fn test_sweep_demotes_and_warns_at_first_tier() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    engine.platform.add_member(&community, member_afk("idle", 31));

    let sweep = provisioned_sweep(&engine, &community).await;
    sweep.sweep_community(&community).await.unwrap();

    let messages = engine.platform.messages(&community);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("🚨"));
    assert!(messages[0].contains("idle#0001"));
    assert!(messages[0].contains("30 days"));

    engine.platform.inspect(&community, |c| {
        let role_id = c.roles[0].id.clone();
        assert_eq!(
            c.role_replacements[&MemberId::new("idle")],
            vec![role_id]
        );
        assert!(c.kicked.is_empty());
    });
}

#[tokio::test]
async fn test_sweep_escalation_messages_without_demotion() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    engine.platform.add_member(&community, member_afk("second", 38));
    engine.platform.add_member(&community, member_afk("last", 45));

    let sweep = provisioned_sweep(&engine, &community).await;
    sweep.sweep_community(&community).await.unwrap();

    let messages = engine.platform.messages(&community);
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().any(|m| m.contains("Second warning") && m.contains("second#0001")));
    assert!(messages.iter().any(|m| m.contains("Last warning") && m.contains("last#0001")));

    engine.platform.inspect(&community, |c| {
        // Demotion happens only at the first tier.
        assert!(c.role_replacements.is_empty());
    });
}

#[tokio::test]
async fn test_sweep_never_removes_the_owner() {
    let engine = TestEngine::new();
    let community = engine.community(60);

    let sweep = provisioned_sweep(&engine, &community).await;
    sweep.sweep_community(&community).await.unwrap();

    assert!(engine.platform.kicked(&community).is_empty());
    assert!(engine.platform.messages(&community).is_empty());
}

#[tokio::test]
async fn test_sweep_silent_member_past_removal_threshold() {
    // A member who never spoke is removable regardless of join date.
    let engine = TestEngine::new();
    let community = engine.community(0);
    engine.platform.add_member(&community, member_silent("ghost", 3));

    let sweep = provisioned_sweep(&engine, &community).await;
    sweep.sweep_community(&community).await.unwrap();

    let messages = engine.platform.messages(&community);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("❌"));
}

#[tokio::test]
async fn test_sweep_removal_is_gated_by_config() {
    // Default policy: the removal notice is posted but nobody is kicked.
    let engine = TestEngine::new();
    let community = engine.community(0);
    engine.platform.add_member(&community, member_afk("gone", 60));

    let sweep = provisioned_sweep(&engine, &community).await;
    sweep.sweep_community(&community).await.unwrap();

    assert!(engine.platform.messages(&community)[0].contains("❌"));
    assert!(engine.platform.kicked(&community).is_empty());

    // Opt-in policy: the member actually gets removed.
    let engine = TestEngine::with_sweep(SweepConfig {
        actually_remove: true,
        ..SweepConfig::default()
    });
    let community = engine.community(0);
    engine.platform.add_member(&community, member_afk("gone", 60));

    let sweep = provisioned_sweep(&engine, &community).await;
    sweep.sweep_community(&community).await.unwrap();

    assert_eq!(engine.platform.kicked(&community), vec![MemberId::new("gone")]);
}

#[tokio::test]
async fn test_sweep_repeats_warnings_by_default() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    engine.platform.add_member(&community, member_afk("idle", 31));

    let sweep = provisioned_sweep(&engine, &community).await;
    sweep.sweep_community(&community).await.unwrap();
    sweep.sweep_community(&community).await.unwrap();

    assert_eq!(engine.platform.messages(&community).len(), 2);
}

#[tokio::test]
async fn test_sweep_suppresses_repeats_when_configured() {
    let engine = TestEngine::with_sweep(SweepConfig {
        repeat_warnings: false,
        ..SweepConfig::default()
    });
    let community = engine.community(0);
    engine.platform.add_member(&community, member_afk("idle", 31));

    let sweep = provisioned_sweep(&engine, &community).await;
    sweep.sweep_community(&community).await.unwrap();
    sweep.sweep_community(&community).await.unwrap();

    // Same tier twice: only the first pass notifies.
    assert_eq!(engine.platform.messages(&community).len(), 1);

    // Escalating to the next tier notifies again.
    engine.platform.set_last_message(
        &community,
        &MemberId::new("idle"),
        Some(days_ago(38)),
    );
    sweep.sweep_community(&community).await.unwrap();
    assert_eq!(engine.platform.messages(&community).len(), 2);
}

#[tokio::test]
async fn test_sweep_all_isolates_failing_communities() {
    let engine = TestEngine::new();
    let healthy = engine.community(0);
    // The second community is never provisioned, so its sweep fails.
    let _unprovisioned = engine.community(0);

    ResourceReconciler::new(&engine.ctx)
        .provision(&healthy)
        .await
        .unwrap();

    let sweep = InactivitySweep::new(engine.ctx.clone());
    let swept = sweep.sweep_all().await;
    assert_eq!(swept, 1);
}

// ============================================================================
// Report Tests
// ============================================================================

#[tokio::test]
async fn test_report_chunks_long_member_lists() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    for i in 0..15 {
        engine
            .platform
            .add_member(&community, member_afk(&format!("m{i}"), 2));
    }

    ResourceReconciler::new(&engine.ctx)
        .provision(&community)
        .await
        .unwrap();

    // 15 members plus the owner: one full chunk and one leftover line.
    let chunks = AfkReport::new(&engine.ctx).render(&community).await.unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].lines().count(), LINES_PER_CHUNK);
    assert_eq!(chunks[1].lines().count(), 1);
}

#[tokio::test]
async fn test_report_marks_members_who_never_spoke() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    engine.platform.add_member(&community, member_silent("ghost", 10));

    ResourceReconciler::new(&engine.ctx)
        .provision(&community)
        .await
        .unwrap();

    let chunks = AfkReport::new(&engine.ctx).render(&community).await.unwrap();
    assert!(chunks[0].contains("🕳️ ghost#0001 — never spoke"));
    assert!(chunks[0].contains("🧍"));
}

#[tokio::test]
async fn test_report_for_untracked_community() {
    let engine = TestEngine::new();
    let chunks = AfkReport::new(&engine.ctx)
        .render(&CommunityId::new("nowhere"))
        .await
        .unwrap();
    assert_eq!(chunks, vec![NO_DATA_REPLY.to_string()]);
}

// ============================================================================
// Dispatcher Tests
// ============================================================================

#[tokio::test]
async fn test_dispatcher_provisions_then_tracks_activity() {
    let engine = TestEngine::new();
    let community = engine.community(0);

    let dispatcher = Arc::new(EventDispatcher::new(
        engine.ctx.clone(),
        DispatcherConfig::default(),
    ));
    let events = dispatcher.handle();
    dispatcher.clone().start();

    events
        .send(PlatformEvent::CommunityJoined {
            community: community.clone(),
        })
        .await
        .unwrap();

    // Provisioning runs on its own task; wait for the persisted record.
    let mut provisioned = false;
    for _ in 0..200 {
        if engine
            .ctx
            .communities()
            .get(&community)
            .await
            .unwrap()
            .is_some()
        {
            provisioned = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(provisioned, "community was not provisioned in time");

    // A new member joins and speaks.
    events
        .send(PlatformEvent::MemberJoined {
            community: community.clone(),
            member: MemberId::new("newbie"),
            tag: "newbie#0001".to_string(),
            joined_at: days_ago(0),
        })
        .await
        .unwrap();
    let spoke_at = days_ago(0);
    events
        .send(PlatformEvent::MessageSent {
            community: community.clone(),
            author: MemberId::new("newbie"),
            from_self: false,
            sent_at: spoke_at,
        })
        .await
        .unwrap();

    // The command reply flows back over the oneshot once both events above
    // have been applied (same worker, strictly ordered).
    let (reply_tx, reply_rx) = oneshot::channel();
    events
        .send(PlatformEvent::CommandInvoked {
            community: community.clone(),
            name: AFKLIST_COMMAND.to_string(),
            reply: reply_tx,
        })
        .await
        .unwrap();
    let chunks = reply_rx.await.unwrap();
    assert!(chunks[0].contains("newbie#0001"));

    let record = engine
        .ctx
        .communities()
        .get(&community)
        .await
        .unwrap()
        .unwrap();
    let newbie = record.member(&MemberId::new("newbie")).unwrap();
    assert_eq!(newbie.last_message_at, Some(spoke_at));

    dispatcher.stop();
}

#[tokio::test]
async fn test_dispatcher_ignores_own_messages_and_unknown_commands() {
    let engine = TestEngine::new();
    let community = engine.community(0);
    ResourceReconciler::new(&engine.ctx)
        .provision(&community)
        .await
        .unwrap();

    let dispatcher = Arc::new(EventDispatcher::new(
        engine.ctx.clone(),
        DispatcherConfig::default(),
    ));
    let events = dispatcher.handle();
    dispatcher.clone().start();

    events
        .send(PlatformEvent::MessageSent {
            community: community.clone(),
            author: MemberId::new("warden"),
            from_self: true,
            sent_at: days_ago(0),
        })
        .await
        .unwrap();

    let (reply_tx, reply_rx) = oneshot::channel();
    events
        .send(PlatformEvent::CommandInvoked {
            community: community.clone(),
            name: "frobnicate".to_string(),
            reply: reply_tx,
        })
        .await
        .unwrap();
    // Unknown commands get no reply; the sender side is simply dropped.
    assert!(reply_rx.await.is_err());

    dispatcher.stop();
}
