//! AFK report
//!
//! Read-only rendering of the ledger for the `afklist` command. One line
//! per member, chunked so each reply stays within platform message limits.

use chrono::Utc;
use tracing::instrument;

use warden_core::{format_afk_duration, CommunityId};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Maximum member lines per reply chunk
pub const LINES_PER_CHUNK: usize = 15;

/// Reply used when the community has no data yet
pub const NO_DATA_REPLY: &str = "No data found for this community.";

/// AFK report renderer
pub struct AfkReport<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AfkReport<'a> {
    /// Create a new AfkReport
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Render the AFK report for a community as reply chunks
    ///
    /// Pure read: renders the persisted record as-is, without touching the
    /// platform. An untracked (or empty) community yields a single
    /// explicit no-data reply rather than silence.
    #[instrument(skip(self))]
    pub async fn render(&self, community: &CommunityId) -> ServiceResult<Vec<String>> {
        let Some(record) = self.ctx.communities().get(community).await? else {
            return Ok(vec![NO_DATA_REPLY.to_string()]);
        };
        if record.members.is_empty() {
            return Ok(vec![NO_DATA_REPLY.to_string()]);
        }

        let now = Utc::now();
        let lines: Vec<String> = record
            .members
            .iter()
            .map(|member| match member.last_message_at {
                Some(last) => format!(
                    "🧍 {} — {} inactive",
                    member.tag,
                    format_afk_duration(now, last)
                ),
                None => format!("🕳️ {} — never spoke", member.tag),
            })
            .collect();

        Ok(lines
            .chunks(LINES_PER_CHUNK)
            .map(|chunk| chunk.join("\n"))
            .collect())
    }
}
