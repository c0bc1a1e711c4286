use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A goal a child works toward. The child's "current goal" is the active
/// (non-redeemed) reward with the lowest priority value; ties are broken by
/// earliest creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub child_id: String,
    pub name: String,
    /// Star threshold to reach. Always greater than zero; enforced at
    /// creation and update so progress never divides by zero.
    pub target_points: i64,
    pub priority: u32,
    pub redeemed: bool,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reward {
    /// Generate a unique ID for a reward
    pub fn generate_id() -> String {
        format!("reward::{}", Uuid::new_v4())
    }

    pub fn is_active(&self) -> bool {
        !self.redeemed
    }
}

/// Append-only snapshot written when a reward is redeemed. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardHistoryEvent {
    pub id: String,
    pub child_id: String,
    pub reward_id: String,
    pub reward_name: String,
    pub target_points: i64,
    pub redeemed_at: DateTime<Utc>,
}

impl RewardHistoryEvent {
    /// Generate a unique ID for a redemption record
    pub fn generate_id() -> String {
        format!("redemption::{}", Uuid::new_v4())
    }
}
