//! Store owning derived gamification state: badges, milestone crossings and
//! the family activity streak.
//!
//! Nothing here is independently authored; re-running the derivations on the
//! same event set yields the same badge and milestone set. Already-awarded
//! badges are never re-awarded, and each milestone threshold fires exactly
//! once per (child, reward) pair.

use chrono::{Duration, Local, NaiveDate, Utc};
use log::{debug, info};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use crate::domain::models::behavior::{BehaviorCategory, BehaviorEvent, BehaviorType};
use crate::domain::models::progression::{ActivityStreak, Badge, Milestone};
use crate::domain::models::reward::Reward;
use crate::domain::preferences::FamilyPreferences;

#[derive(Default)]
struct ProgressionState {
    streak: ActivityStreak,
    /// child id -> badges earned so far
    awarded_badges: HashMap<String, Vec<Badge>>,
    /// (child id, reward id) -> threshold percents already reported
    reported_thresholds: HashMap<(String, String), BTreeSet<u8>>,
}

pub struct ProgressionStore {
    preferences: FamilyPreferences,
    state: Mutex<ProgressionState>,
}

impl ProgressionStore {
    pub fn new(preferences: FamilyPreferences) -> Self {
        Self {
            preferences,
            state: Mutex::new(ProgressionState::default()),
        }
    }

    /// Bump the parent-activity streak, keyed by local calendar day.
    /// A second call on the same day is a no-op; a consecutive day
    /// increments; a gap resets the count to 1. Returns the current streak.
    pub fn record_activity(&self) -> u32 {
        self.record_activity_on(Local::now().date_naive())
    }

    fn record_activity_on(&self, today: NaiveDate) -> u32 {
        let mut state = self.state.lock().unwrap();
        let streak = &mut state.streak;

        match streak.last_active_day {
            Some(day) if day == today => {}
            Some(day) if today - day == Duration::days(1) => {
                streak.current += 1;
                streak.last_active_day = Some(today);
            }
            _ => {
                streak.current = 1;
                streak.last_active_day = Some(today);
            }
        }

        debug!("Parent activity streak: {} day(s)", streak.current);
        streak.current
    }

    /// Current activity streak
    pub fn streak(&self) -> ActivityStreak {
        self.state.lock().unwrap().streak.clone()
    }

    /// Badges the child has earned so far
    pub fn badges_for_child(&self, child_id: &str) -> Vec<Badge> {
        self.state
            .lock()
            .unwrap()
            .awarded_badges
            .get(child_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Evaluate the configured badge rules against the child's full event
    /// history and award at most one new badge. Rules whose badge the child
    /// already holds are skipped, so calling this again with an unchanged
    /// event set yields nothing.
    pub fn check_and_award_badges(
        &self,
        child_id: &str,
        events: &[BehaviorEvent],
        behavior_types: &[BehaviorType],
    ) -> Option<Badge> {
        let categories: HashMap<&str, BehaviorCategory> = behavior_types
            .iter()
            .map(|t| (t.id.as_str(), t.category))
            .collect();

        let mut counts: HashMap<BehaviorCategory, usize> = HashMap::new();
        for event in events.iter().filter(|e| e.child_id == child_id) {
            if let Some(category) = categories.get(event.behavior_type_id.as_str()) {
                *counts.entry(*category).or_default() += 1;
            }
        }

        let mut state = self.state.lock().unwrap();
        let earned = state
            .awarded_badges
            .entry(child_id.to_string())
            .or_default();

        for rule in &self.preferences.badge_rules {
            if earned.iter().any(|b| b.rule_id == rule.id) {
                continue;
            }
            let count = counts.get(&rule.category).copied().unwrap_or(0);
            if count >= rule.required_count {
                let badge = Badge {
                    rule_id: rule.id.clone(),
                    child_id: child_id.to_string(),
                    name: rule.name.clone(),
                    category: rule.category,
                    required_count: rule.required_count,
                    earned_at: Utc::now(),
                };
                info!("Awarded badge '{}' to child {}", badge.name, child_id);
                earned.push(badge.clone());
                return Some(badge);
            }
        }

        None
    }

    /// Report a milestone when `current_stars` crosses a configured
    /// threshold of the reward's target. Each threshold fires exactly once
    /// per (child, reward); when one call crosses several thresholds at
    /// once, all are marked reported and the highest one is returned.
    pub fn check_for_milestone(
        &self,
        child_id: &str,
        child_name: &str,
        current_stars: i64,
        reward: &Reward,
    ) -> Option<Milestone> {
        let percent = current_stars.max(0) as f64 / reward.target_points as f64 * 100.0;

        let mut state = self.state.lock().unwrap();
        let reported = state
            .reported_thresholds
            .entry((child_id.to_string(), reward.id.clone()))
            .or_default();

        let mut thresholds = self.preferences.milestone_thresholds.clone();
        thresholds.sort_unstable();

        let mut newly_crossed = None;
        for threshold in thresholds {
            if percent >= f64::from(threshold) && reported.insert(threshold) {
                newly_crossed = Some(threshold);
            }
        }

        newly_crossed.map(|threshold_percent| {
            info!(
                "Child {} crossed {}% of reward '{}'",
                child_name, threshold_percent, reward.name
            );
            Milestone {
                child_id: child_id.to_string(),
                child_name: child_name.to_string(),
                reward_id: reward.id.clone(),
                reward_name: reward.name.clone(),
                threshold_percent,
                stars_at_crossing: current_stars,
                achieved_at: Utc::now(),
            }
        })
    }
}
