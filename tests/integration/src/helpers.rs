//! Test helpers
//!
//! Assembles an engine instance (fake platform + file store in a temp dir +
//! default config) and provides scripted-member builders.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;

use warden_common::{ModerationConfig, SweepConfig};
use warden_core::{CommunityId, MemberId, PlatformMember};
use warden_service::ServiceContext;
use warden_store::{CommunityStore, JsonStore};

use crate::fake_platform::FakePlatform;

/// Counter for unique test ids
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A timestamp the given number of days in the past
pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

/// A scripted member whose last message was `afk_days` days ago
pub fn member_afk(id: &str, afk_days: i64) -> PlatformMember {
    PlatformMember {
        id: MemberId::new(id),
        tag: format!("{id}#0001"),
        joined_at: days_ago(afk_days + 30),
        last_message_at: Some(days_ago(afk_days)),
        roles: Vec::new(),
        is_owner: false,
    }
}

/// A scripted member who has never sent a message
pub fn member_silent(id: &str, joined_days_ago: i64) -> PlatformMember {
    PlatformMember {
        id: MemberId::new(id),
        tag: format!("{id}#0001"),
        joined_at: days_ago(joined_days_ago),
        last_message_at: None,
        roles: Vec::new(),
        is_owner: false,
    }
}

/// Fully wired engine over a fake platform and a temp-dir store
pub struct TestEngine {
    pub ctx: ServiceContext,
    pub platform: Arc<FakePlatform>,
    _data_dir: TempDir,
}

impl TestEngine {
    /// Engine with default moderation names and sweep policy
    pub fn new() -> Self {
        Self::with_sweep(SweepConfig::default())
    }

    /// Engine with a custom sweep policy
    pub fn with_sweep(sweep: SweepConfig) -> Self {
        let data_dir = TempDir::new().expect("temp dir");
        let store = Arc::new(JsonStore::new(data_dir.path().join("warden-data.json")));
        let platform = Arc::new(FakePlatform::new());

        let ctx = ServiceContext::new(
            platform.clone(),
            CommunityStore::new(store),
            ModerationConfig::default(),
            sweep,
        );

        Self {
            ctx,
            platform,
            _data_dir: data_dir,
        }
    }

    /// Script a fresh community with an owner and return its id
    pub fn community(&self, owner_afk_days: i64) -> CommunityId {
        let suffix = unique_suffix();
        let id = CommunityId::new(format!("G{suffix}"));
        let owner = MemberId::new(format!("owner{suffix}"));
        self.platform
            .add_community(&id, &format!("Guild {suffix}"), &owner);

        let mut owner_member = member_afk(owner.as_str(), owner_afk_days);
        owner_member.is_owner = true;
        self.platform.add_member(&id, owner_member);
        id
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}
