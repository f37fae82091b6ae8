//! Value objects - immutable types that represent domain concepts

mod afk;
mod ids;
mod slug;
mod tier;

pub use afk::format_afk_duration;
pub use ids::{CommunityId, MemberId};
pub use slug::channel_slug;
pub use tier::{Inactivity, InactivityTier, TierThresholds};
