//! Derived gamification state: badges, milestones and the family activity
//! streak. Everything here is recomputable from the behavior event history;
//! none of it is independently authored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::behavior::BehaviorCategory;

/// A persistent achievement marker, awarded once when a qualifying
/// condition over the event history is first met.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    /// The badge rule that produced this badge; one badge per rule per child.
    pub rule_id: String,
    pub child_id: String,
    pub name: String,
    pub category: BehaviorCategory,
    pub required_count: usize,
    pub earned_at: DateTime<Utc>,
}

/// A notable progress-threshold crossing toward a reward, reported at most
/// once per (child, reward, threshold).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub child_id: String,
    pub child_name: String,
    pub reward_id: String,
    pub reward_name: String,
    pub threshold_percent: u8,
    pub stars_at_crossing: i64,
    pub achieved_at: DateTime<Utc>,
}

/// Family-wide parent activity streak, keyed by local calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityStreak {
    pub current: u32,
    pub last_active_day: Option<NaiveDate>,
}
