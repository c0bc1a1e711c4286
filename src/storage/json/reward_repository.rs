//! JSON-backed repositories for rewards and the append-only redemption
//! history.

use anyhow::{anyhow, Result};
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::{load_collection, store_collection, JsonConnection};
use crate::domain::models::reward::{Reward, RewardHistoryEvent};
use crate::storage::traits::{RewardHistoryStorage, RewardStorage};

const REWARDS_FILE: &str = "rewards.json";
const REWARD_HISTORY_FILE: &str = "reward_history.json";

/// JSON-backed reward repository
#[derive(Clone)]
pub struct RewardRepository {
    connection: Arc<JsonConnection>,
}

impl RewardRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn file_path(&self) -> PathBuf {
        self.connection.collection_path(REWARDS_FILE)
    }
}

impl RewardStorage for RewardRepository {
    fn add_reward(&self, reward: &Reward) -> Result<()> {
        let mut rewards: Vec<Reward> = load_collection(&self.file_path())?;
        if rewards.iter().any(|r| r.id == reward.id) {
            return Err(anyhow!("reward already exists: {}", reward.id));
        }
        rewards.push(reward.clone());
        store_collection(&self.file_path(), &rewards)?;
        debug!("Stored reward {} ({})", reward.name, reward.id);
        Ok(())
    }

    fn get_rewards(&self) -> Result<Vec<Reward>> {
        load_collection(&self.file_path())
    }

    fn update_reward(&self, reward: &Reward) -> Result<()> {
        let mut rewards: Vec<Reward> = load_collection(&self.file_path())?;
        match rewards.iter_mut().find(|r| r.id == reward.id) {
            Some(existing) => *existing = reward.clone(),
            None => {
                warn!("Attempted to update a non-existent reward: {}", reward.id);
                return Err(anyhow!("reward not found for update: {}", reward.id));
            }
        }
        store_collection(&self.file_path(), &rewards)
    }

    fn delete_reward(&self, reward_id: &str) -> Result<bool> {
        let mut rewards: Vec<Reward> = load_collection(&self.file_path())?;
        let before = rewards.len();
        rewards.retain(|r| r.id != reward_id);
        if rewards.len() == before {
            return Ok(false);
        }
        store_collection(&self.file_path(), &rewards)?;
        Ok(true)
    }
}

/// JSON-backed, append-only redemption history repository
#[derive(Clone)]
pub struct RewardHistoryRepository {
    connection: Arc<JsonConnection>,
}

impl RewardHistoryRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn file_path(&self) -> PathBuf {
        self.connection.collection_path(REWARD_HISTORY_FILE)
    }
}

impl RewardHistoryStorage for RewardHistoryRepository {
    fn add_history_event(&self, history_event: &RewardHistoryEvent) -> Result<()> {
        let mut history: Vec<RewardHistoryEvent> = load_collection(&self.file_path())?;
        history.push(history_event.clone());
        store_collection(&self.file_path(), &history)?;
        debug!(
            "Appended redemption record {} for reward {}",
            history_event.id, history_event.reward_id
        );
        Ok(())
    }

    fn get_history(&self) -> Result<Vec<RewardHistoryEvent>> {
        load_collection(&self.file_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn setup() -> (RewardRepository, RewardHistoryRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        (
            RewardRepository::new(connection.clone()),
            RewardHistoryRepository::new(connection),
            temp_dir,
        )
    }

    fn sample_reward(id: &str, priority: u32) -> Reward {
        let now = Utc::now();
        Reward {
            id: id.to_string(),
            child_id: "child::a".to_string(),
            name: "Trip to the zoo".to_string(),
            target_points: 20,
            priority,
            redeemed: false,
            redeemed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_reward_crud() {
        let (rewards, _history, _temp_dir) = setup();

        let mut reward = sample_reward("reward::1", 1);
        rewards.add_reward(&reward).unwrap();
        assert_eq!(rewards.get_rewards().unwrap().len(), 1);

        reward.redeemed = true;
        reward.redeemed_at = Some(Utc::now());
        rewards.update_reward(&reward).unwrap();
        assert!(rewards.get_rewards().unwrap()[0].redeemed);

        assert!(rewards.delete_reward("reward::1").unwrap());
        assert!(rewards.get_rewards().unwrap().is_empty());
    }

    #[test]
    fn test_history_is_appended() {
        let (_rewards, history, _temp_dir) = setup();

        let record = RewardHistoryEvent {
            id: "redemption::1".to_string(),
            child_id: "child::a".to_string(),
            reward_id: "reward::1".to_string(),
            reward_name: "Trip to the zoo".to_string(),
            target_points: 20,
            redeemed_at: Utc::now(),
        };
        history.add_history_event(&record).unwrap();
        history
            .add_history_event(&RewardHistoryEvent {
                id: "redemption::2".to_string(),
                ..record
            })
            .unwrap();

        assert_eq!(history.get_history().unwrap().len(), 2);
    }
}
