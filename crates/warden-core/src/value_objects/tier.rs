//! Inactivity tiers - the staged escalation model
//!
//! A member's tier is never stored; it is recomputed from the last-activity
//! timestamp on every sweep. Bands are left-closed/right-open: a member at
//! exactly the second threshold is `FinalWarned`, never `Warned`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Elapsed inactivity of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inactivity {
    /// The member has never been observed sending a message
    Never,
    /// Whole days since the member's last message
    Days(i64),
}

impl Inactivity {
    /// Derive inactivity from an optional last-message timestamp
    ///
    /// A timestamp in the future (clock skew between us and the platform)
    /// counts as zero days.
    pub fn since(now: DateTime<Utc>, last_message_at: Option<DateTime<Utc>>) -> Self {
        match last_message_at {
            Some(last) => Self::Days((now - last).num_days().max(0)),
            None => Self::Never,
        }
    }
}

/// Day thresholds for the four escalation boundaries, ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Days of silence before the first warning (and role demotion)
    pub warn_after: i64,
    /// Days before the second warning
    pub final_warn_after: i64,
    /// Days before the final warning
    pub last_chance_after: i64,
    /// Days before removal from the community
    pub remove_after: i64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            warn_after: 30,
            final_warn_after: 37,
            last_chance_after: 44,
            remove_after: 50,
        }
    }
}

impl TierThresholds {
    /// Check that the thresholds form an ascending, positive sequence
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.warn_after <= 0 {
            return Err(DomainError::InvalidThresholds(
                "warn threshold must be positive".to_string(),
            ));
        }
        if self.warn_after > self.final_warn_after
            || self.final_warn_after > self.last_chance_after
            || self.last_chance_after > self.remove_after
        {
            return Err(DomainError::InvalidThresholds(format!(
                "thresholds must be ascending: {}/{}/{}/{}",
                self.warn_after, self.final_warn_after, self.last_chance_after, self.remove_after
            )));
        }
        Ok(())
    }
}

/// Discrete inactivity classification derived from elapsed silence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InactivityTier {
    /// Below the first threshold, nothing to do
    Active,
    /// First warning band: demote to the moderation role and notify
    Warned,
    /// Second warning band: notify only
    FinalWarned,
    /// Final warning band: notify only
    LastChance,
    /// At or past the removal threshold
    Removable,
}

impl InactivityTier {
    /// Classify elapsed inactivity against the thresholds
    ///
    /// "Never spoke" is treated as unbounded inactivity and lands in
    /// `Removable`, never `Active`.
    pub fn classify(inactivity: Inactivity, thresholds: &TierThresholds) -> Self {
        let days = match inactivity {
            Inactivity::Never => return Self::Removable,
            Inactivity::Days(days) => days,
        };

        if days < thresholds.warn_after {
            Self::Active
        } else if days < thresholds.final_warn_after {
            Self::Warned
        } else if days < thresholds.last_chance_after {
            Self::FinalWarned
        } else if days < thresholds.remove_after {
            Self::LastChance
        } else {
            Self::Removable
        }
    }
}
