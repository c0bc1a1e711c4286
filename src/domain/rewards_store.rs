//! Store owning reward (goal) definitions and the redemption history.

use chrono::Utc;
use log::info;
use std::sync::{Arc, Mutex};

use crate::domain::commands::reward::{CreateRewardCommand, UpdateRewardCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::reward::{Reward, RewardHistoryEvent};
use crate::storage::traits::{RewardHistoryStorage, RewardStorage};

const MAX_NAME_LENGTH: usize = 100;

pub struct RewardsStore {
    reward_repository: Arc<dyn RewardStorage>,
    history_repository: Arc<dyn RewardHistoryStorage>,
    rewards: Mutex<Vec<Reward>>,
    history: Mutex<Vec<RewardHistoryEvent>>,
}

impl RewardsStore {
    /// Create a new RewardsStore, loading both caches from the repositories
    pub fn new(
        reward_repository: Arc<dyn RewardStorage>,
        history_repository: Arc<dyn RewardHistoryStorage>,
    ) -> DomainResult<Self> {
        let rewards = reward_repository
            .get_rewards()
            .map_err(DomainError::persistence)?;
        let history = history_repository
            .get_history()
            .map_err(DomainError::persistence)?;
        Ok(Self {
            reward_repository,
            history_repository,
            rewards: Mutex::new(rewards),
            history: Mutex::new(history),
        })
    }

    /// Create a reward. A target of zero or fewer stars is rejected here so
    /// progress never has to guard a division at read time.
    pub fn add(&self, command: CreateRewardCommand) -> DomainResult<Reward> {
        let name = validated_name(&command.name)?;
        validate_target(command.target_points)?;
        info!("Creating reward '{}' for child {}", name, command.child_id);

        let now = Utc::now();
        let reward = Reward {
            id: Reward::generate_id(),
            child_id: command.child_id,
            name,
            target_points: command.target_points,
            priority: command.priority,
            redeemed: false,
            redeemed_at: None,
            created_at: now,
            updated_at: now,
        };

        self.reward_repository
            .add_reward(&reward)
            .map_err(DomainError::persistence)?;
        self.refresh_rewards()?;

        Ok(reward)
    }

    /// Update a reward's attributes
    pub fn update(&self, command: UpdateRewardCommand) -> DomainResult<Reward> {
        let mut reward = self
            .get(&command.reward_id)
            .ok_or_else(|| DomainError::not_found("reward"))?;

        if let Some(name) = command.name {
            reward.name = validated_name(&name)?;
        }
        if let Some(target_points) = command.target_points {
            validate_target(target_points)?;
            reward.target_points = target_points;
        }
        if let Some(priority) = command.priority {
            reward.priority = priority;
        }
        reward.updated_at = Utc::now();

        self.reward_repository
            .update_reward(&reward)
            .map_err(DomainError::persistence)?;
        self.refresh_rewards()?;

        Ok(reward)
    }

    /// Delete a reward
    pub fn delete(&self, reward_id: &str) -> DomainResult<()> {
        let removed = self
            .reward_repository
            .delete_reward(reward_id)
            .map_err(DomainError::persistence)?;
        if !removed {
            return Err(DomainError::not_found("reward"));
        }
        self.refresh_rewards()?;
        Ok(())
    }

    /// Get a reward by ID
    pub fn get(&self, reward_id: &str) -> Option<Reward> {
        self.rewards
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == reward_id)
            .cloned()
    }

    /// All rewards for a child, ordered by priority then creation
    pub fn rewards_for_child(&self, child_id: &str) -> Vec<Reward> {
        let mut rewards: Vec<Reward> = self
            .rewards
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.child_id == child_id)
            .cloned()
            .collect();
        rewards.sort_by_key(|r| (r.priority, r.created_at));
        rewards
    }

    /// Non-redeemed rewards for a child
    pub fn active_rewards(&self, child_id: &str) -> Vec<Reward> {
        self.rewards_for_child(child_id)
            .into_iter()
            .filter(Reward::is_active)
            .collect()
    }

    /// The child's current goal: the active reward with the lowest priority
    /// value, ties broken by earliest creation
    pub fn current_goal(&self, child_id: &str) -> Option<Reward> {
        self.active_rewards(child_id)
            .into_iter()
            .min_by_key(|r| (r.priority, r.created_at))
    }

    /// Progress toward a reward as a ratio clamped to [0, 1]
    pub fn progress(&self, reward: &Reward, current_stars: i64) -> f64 {
        (current_stars as f64 / reward.target_points as f64).clamp(0.0, 1.0)
    }

    /// Redeem a reward: mark it redeemed and append exactly one history
    /// snapshot. The two writes are one logical transaction; if the history
    /// append fails after the reward update succeeded, the error is
    /// reported as-is and no rollback is attempted.
    pub fn redeem(&self, reward_id: &str) -> DomainResult<(Reward, RewardHistoryEvent)> {
        let mut reward = self
            .get(reward_id)
            .ok_or_else(|| DomainError::not_found("reward"))?;
        if reward.redeemed {
            return Err(DomainError::validation(
                "This reward has already been redeemed",
            ));
        }

        let redeemed_at = Utc::now();
        reward.redeemed = true;
        reward.redeemed_at = Some(redeemed_at);
        reward.updated_at = redeemed_at;

        self.reward_repository
            .update_reward(&reward)
            .map_err(DomainError::persistence)?;

        let history_event = RewardHistoryEvent {
            id: RewardHistoryEvent::generate_id(),
            child_id: reward.child_id.clone(),
            reward_id: reward.id.clone(),
            reward_name: reward.name.clone(),
            target_points: reward.target_points,
            redeemed_at,
        };
        self.history_repository
            .add_history_event(&history_event)
            .map_err(DomainError::persistence)?;

        self.refresh_rewards()?;
        self.refresh_history()?;

        info!(
            "Redeemed reward '{}' for child {}",
            reward.name, reward.child_id
        );
        Ok((reward, history_event))
    }

    /// Redemption history for a child, most recent first
    pub fn history_for_child(&self, child_id: &str) -> Vec<RewardHistoryEvent> {
        let mut history: Vec<RewardHistoryEvent> = self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.child_id == child_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.redeemed_at.cmp(&a.redeemed_at));
        history
    }

    fn refresh_rewards(&self) -> DomainResult<()> {
        let rewards = self
            .reward_repository
            .get_rewards()
            .map_err(DomainError::persistence)?;
        *self.rewards.lock().unwrap() = rewards;
        Ok(())
    }

    fn refresh_history(&self) -> DomainResult<()> {
        let history = self
            .history_repository
            .get_history()
            .map_err(DomainError::persistence)?;
        *self.history.lock().unwrap() = history;
        Ok(())
    }
}

fn validated_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Reward name cannot be empty"));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(
            "Reward name cannot exceed 100 characters",
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_target(target_points: i64) -> DomainResult<()> {
    if target_points <= 0 {
        return Err(DomainError::validation(
            "A reward needs a target of at least one star",
        ));
    }
    Ok(())
}
