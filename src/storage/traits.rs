//! # Storage Traits
//!
//! Storage abstraction traits that let different backends be used
//! interchangeably by the domain layer. All operations are synchronous;
//! each write either fully succeeds or leaves prior state untouched, and
//! each read returns the full current collection.

use anyhow::Result;

use crate::domain::models::behavior::{BehaviorEvent, BehaviorType};
use crate::domain::models::child::Child;
use crate::domain::models::reward::{Reward, RewardHistoryEvent};

/// Trait defining the interface for child storage operations
pub trait ChildStorage: Send + Sync {
    /// Store a new child
    fn add_child(&self, child: &Child) -> Result<()>;

    /// Return all children
    fn get_children(&self) -> Result<Vec<Child>>;

    /// Update an existing child
    fn update_child(&self, child: &Child) -> Result<()>;

    /// Delete a child by ID. Returns true if a record was removed.
    fn delete_child(&self, child_id: &str) -> Result<bool>;
}

/// Trait defining the interface for behavior type storage operations
pub trait BehaviorTypeStorage: Send + Sync {
    /// Store a new behavior type
    fn add_behavior_type(&self, behavior_type: &BehaviorType) -> Result<()>;

    /// Return the full behavior type catalog
    fn get_behavior_types(&self) -> Result<Vec<BehaviorType>>;

    /// Update an existing behavior type
    fn update_behavior_type(&self, behavior_type: &BehaviorType) -> Result<()>;

    /// Delete a behavior type by ID. Returns true if a record was removed.
    fn delete_behavior_type(&self, behavior_type_id: &str) -> Result<bool>;
}

/// Trait defining the interface for behavior event storage operations
pub trait BehaviorEventStorage: Send + Sync {
    /// Store a new behavior event
    fn add_event(&self, event: &BehaviorEvent) -> Result<()>;

    /// Return all behavior events
    fn get_events(&self) -> Result<Vec<BehaviorEvent>>;

    /// Update an existing behavior event
    fn update_event(&self, event: &BehaviorEvent) -> Result<()>;

    /// Delete a behavior event by ID. Returns true if a record was removed.
    fn delete_event(&self, event_id: &str) -> Result<bool>;
}

/// Trait defining the interface for reward storage operations
pub trait RewardStorage: Send + Sync {
    /// Store a new reward
    fn add_reward(&self, reward: &Reward) -> Result<()>;

    /// Return all rewards
    fn get_rewards(&self) -> Result<Vec<Reward>>;

    /// Update an existing reward
    fn update_reward(&self, reward: &Reward) -> Result<()>;

    /// Delete a reward by ID. Returns true if a record was removed.
    fn delete_reward(&self, reward_id: &str) -> Result<bool>;
}

/// Trait defining the interface for redemption history storage.
/// History is append-only: records are created on redemption, never mutated.
pub trait RewardHistoryStorage: Send + Sync {
    /// Append a redemption record
    fn add_history_event(&self, history_event: &RewardHistoryEvent) -> Result<()>;

    /// Return all redemption records
    fn get_history(&self) -> Result<Vec<RewardHistoryEvent>>;
}
