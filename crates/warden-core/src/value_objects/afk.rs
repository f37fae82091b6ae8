//! AFK duration formatting for the report surface

use chrono::{DateTime, Utc};

/// Render elapsed time since a member's last message as "<d>d <h>h <m>m"
///
/// Decomposition matches wall-clock intuition: whole days, then hours
/// within the day, then minutes within the hour. Negative durations
/// (clock skew) render as zero.
pub fn format_afk_duration(now: DateTime<Utc>, last_message_at: DateTime<Utc>) -> String {
    let elapsed = (now - last_message_at).num_minutes().max(0);

    let days = elapsed / (60 * 24);
    let hours = (elapsed / 60) % 24;
    let minutes = elapsed % 60;

    format!("{days}d {hours}h {minutes}m")
}
