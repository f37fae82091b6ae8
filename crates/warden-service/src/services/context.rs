//! Service context - dependency container for services
//!
//! Built once at startup and handed (by clone) to every component; nothing
//! in the engine reaches for global state.

use std::sync::Arc;

use warden_common::{ModerationConfig, SweepConfig};
use warden_core::PlatformClient;
use warden_store::CommunityStore;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    platform: Arc<dyn PlatformClient>,
    communities: CommunityStore,
    moderation: ModerationConfig,
    sweep: SweepConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        platform: Arc<dyn PlatformClient>,
        communities: CommunityStore,
        moderation: ModerationConfig,
        sweep: SweepConfig,
    ) -> Self {
        Self {
            platform,
            communities,
            moderation,
            sweep,
        }
    }

    /// Get the platform client
    pub fn platform(&self) -> &dyn PlatformClient {
        self.platform.as_ref()
    }

    /// Get the community store
    pub fn communities(&self) -> &CommunityStore {
        &self.communities
    }

    /// Get the moderation resource names
    pub fn moderation(&self) -> &ModerationConfig {
        &self.moderation
    }

    /// Get the sweep configuration
    pub fn sweep(&self) -> &SweepConfig {
        &self.sweep
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("platform", &"dyn PlatformClient")
            .field("moderation", &self.moderation)
            .field("sweep", &self.sweep)
            .finish()
    }
}
