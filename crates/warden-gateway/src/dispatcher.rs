//! Event dispatcher
//!
//! Consumes typed platform events from a bounded intake channel and routes
//! each one to a per-community worker task, so all events of one community
//! are handled strictly in arrival order while different communities
//! proceed independently. Startup and community-join events trigger
//! provisioning directly.
//!
//! A failure inside any handler is logged and contained; the dispatcher
//! and the other communities keep running.

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use warden_core::CommunityId;
use warden_service::services::{ActivityLedger, AfkReport, ResourceReconciler, ServiceContext};

use crate::events::{PlatformEvent, AFKLIST_COMMAND};

/// Configuration for the event dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Intake channel capacity
    pub intake_buffer: usize,
    /// Per-community worker queue capacity
    pub worker_buffer: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            intake_buffer: 256,
            worker_buffer: 64,
        }
    }
}

/// Event dispatcher that routes platform events to per-community workers
pub struct EventDispatcher {
    ctx: ServiceContext,
    config: DispatcherConfig,
    intake_tx: mpsc::Sender<PlatformEvent>,
    intake_rx: Mutex<Option<mpsc::Receiver<PlatformEvent>>>,
    workers: DashMap<CommunityId, mpsc::Sender<PlatformEvent>>,
    running: AtomicBool,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    pub fn new(ctx: ServiceContext, config: DispatcherConfig) -> Self {
        let (intake_tx, intake_rx) = mpsc::channel(config.intake_buffer);
        Self {
            ctx,
            config,
            intake_tx,
            intake_rx: Mutex::new(Some(intake_rx)),
            workers: DashMap::new(),
            running: AtomicBool::new(false),
        }
    }

    /// Sender half used by the platform adapter to push events
    pub fn handle(&self) -> mpsc::Sender<PlatformEvent> {
        self.intake_tx.clone()
    }

    /// Start the dispatcher loop on a background task
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Event dispatcher is already running");
            return;
        }

        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.run().await;
        });

        info!("Event dispatcher started");
    }

    /// Stop the dispatcher and shut down all community workers
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        // Dropping the senders ends each worker after it drains its queue.
        self.workers.clear();
        info!("Event dispatcher stopped");
    }

    /// Check if the dispatcher is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self) {
        let receiver = self.intake_rx.lock().await.take();
        let Some(mut receiver) = receiver else {
            warn!("Event dispatcher started twice, ignoring");
            return;
        };

        while self.running.load(Ordering::SeqCst) {
            match receiver.recv().await {
                Some(event) => self.dispatch(event).await,
                None => break,
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!("Event dispatcher loop ended");
    }

    async fn dispatch(&self, event: PlatformEvent) {
        debug!(kind = event.kind(), "Dispatching event");

        match event {
            PlatformEvent::Ready { communities } => {
                info!(count = communities.len(), "Platform session ready, provisioning communities");
                for community in communities {
                    self.spawn_provisioning(community);
                }
            }
            PlatformEvent::CommunityJoined { community } => {
                info!(community_id = %community, "Joined new community, provisioning");
                self.spawn_provisioning(community);
            }
            event => {
                // Everything else carries a community id and is serialized
                // through that community's worker.
                let Some(community) = event.community().cloned() else {
                    return;
                };
                let sender = self.worker_sender(&community);
                if sender.send(event).await.is_err() {
                    warn!(community_id = %community, "Community worker is gone, dropping event");
                    self.workers.remove(&community);
                }
            }
        }
    }

    /// Provisioning talks to the platform at length, so it runs on its own
    /// task instead of stalling the dispatch loop.
    fn spawn_provisioning(&self, community: CommunityId) {
        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            let reconciler = ResourceReconciler::new(&ctx);
            if let Err(err) = reconciler.provision(&community).await {
                warn!(
                    community_id = %community,
                    error = %err,
                    "Provisioning failed, community skipped this cycle"
                );
            }
        });
    }

    fn worker_sender(&self, community: &CommunityId) -> mpsc::Sender<PlatformEvent> {
        if let Some(sender) = self.workers.get(community) {
            return sender.clone();
        }

        let (tx, rx) = mpsc::channel(self.config.worker_buffer);
        self.workers.insert(community.clone(), tx.clone());
        tokio::spawn(community_worker(self.ctx.clone(), community.clone(), rx));
        debug!(community_id = %community, "Community worker spawned");
        tx
    }
}

/// Worker owning all event handling for one community
async fn community_worker(
    ctx: ServiceContext,
    community: CommunityId,
    mut rx: mpsc::Receiver<PlatformEvent>,
) {
    while let Some(event) = rx.recv().await {
        if let Err(err) = handle_event(&ctx, &community, event).await {
            warn!(
                community_id = %community,
                error = %err,
                "Event handling failed, continuing"
            );
        }
    }
    debug!(community_id = %community, "Community worker ended");
}

async fn handle_event(
    ctx: &ServiceContext,
    community: &CommunityId,
    event: PlatformEvent,
) -> warden_service::ServiceResult<()> {
    let ledger = ActivityLedger::new(ctx);

    match event {
        PlatformEvent::MemberJoined {
            member,
            tag,
            joined_at,
            ..
        } => ledger.record_join(community, member, tag, joined_at).await,
        PlatformEvent::MemberLeft { member, .. } => ledger.record_leave(community, &member).await,
        PlatformEvent::MessageSent {
            author,
            from_self,
            sent_at,
            ..
        } => {
            if from_self {
                // Never track the automation's own messages.
                return Ok(());
            }
            ledger.record_message(community, &author, sent_at).await
        }
        PlatformEvent::CommandInvoked { name, reply, .. } => {
            if name != AFKLIST_COMMAND {
                debug!(command = %name, "Unrecognized command, ignoring");
                return Ok(());
            }
            let chunks = AfkReport::new(ctx).render(community).await?;
            // The invoker may have gone away; that is not our problem.
            let _ = reply.send(chunks);
            Ok(())
        }
        PlatformEvent::Ready { .. } | PlatformEvent::CommunityJoined { .. } => {
            debug!("Provisioning event reached a worker, ignoring");
            Ok(())
        }
    }
}
