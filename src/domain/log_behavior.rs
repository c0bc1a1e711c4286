//! The behavior-logging workflow: one use case coordinating the four stores
//! into a single logging transaction with a consolidated result.

use log::info;
use std::sync::Arc;

use crate::domain::behaviors_store::BehaviorsStore;
use crate::domain::celebration::{Celebration, CelebrationSink};
use crate::domain::children_store::ChildrenStore;
use crate::domain::commands::behavior::CreateBehaviorEventCommand;
use crate::domain::commands::logging::{LogBehaviorCommand, LogBehaviorOutput};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::progression_store::ProgressionStore;
use crate::domain::rewards_store::RewardsStore;

/// Pure coordinator for logging one behavior event. It performs no
/// persistence or UI side effects beyond the store calls and the
/// celebration sink; a failing step aborts the rest (fail-fast, no retry).
pub struct LogBehaviorUseCase {
    children: Arc<ChildrenStore>,
    behaviors: Arc<BehaviorsStore>,
    rewards: Arc<RewardsStore>,
    progression: Arc<ProgressionStore>,
    celebrations: Arc<dyn CelebrationSink>,
}

impl LogBehaviorUseCase {
    pub fn new(
        children: Arc<ChildrenStore>,
        behaviors: Arc<BehaviorsStore>,
        rewards: Arc<RewardsStore>,
        progression: Arc<ProgressionStore>,
        celebrations: Arc<dyn CelebrationSink>,
    ) -> Self {
        Self {
            children,
            behaviors,
            rewards,
            progression,
            celebrations,
        }
    }

    pub fn execute(&self, command: LogBehaviorCommand) -> DomainResult<LogBehaviorOutput> {
        info!(
            "Logging behavior {} for child {}",
            command.behavior_type_id, command.child_id
        );

        // Both references must resolve to an existing, usable entity before
        // anything is persisted.
        let child = self
            .children
            .get(&command.child_id)
            .filter(|c| !c.archived)
            .ok_or_else(|| DomainError::not_found("child"))?;
        let behavior_type = self
            .behaviors
            .get_type(&command.behavior_type_id)
            .filter(|t| t.active)
            .ok_or_else(|| DomainError::not_found("behavior"))?;

        let event = self.behaviors.add_event(CreateBehaviorEventCommand {
            child_id: child.id.clone(),
            behavior_type_id: behavior_type.id.clone(),
            points_applied: command.points_applied,
            occurred_at: None,
            note: command.note,
            logged_by: command.logged_by,
            media_refs: command.media_refs,
        })?;

        if event.points_applied > 0 {
            self.progression.record_activity();
        }

        let new_star_total = self.behaviors.star_total(&child.id)?;

        let events = self.behaviors.events_for_child(&child.id);
        let types = self.behaviors.all_types();
        let earned_badge = self
            .progression
            .check_and_award_badges(&child.id, &events, &types);
        if let Some(badge) = &earned_badge {
            self.celebrations
                .celebrate(Celebration::BadgeEarned(badge.clone()));
        }

        let current_goal = self.rewards.current_goal(&child.id);
        let milestone = current_goal.as_ref().and_then(|goal| {
            self.progression
                .check_for_milestone(&child.id, &child.name, new_star_total, goal)
        });
        if let Some(milestone) = &milestone {
            self.celebrations
                .celebrate(Celebration::MilestoneReached(milestone.clone()));
        }

        let mut goal_reached = false;
        if let Some(goal) = &current_goal {
            if new_star_total >= goal.target_points {
                goal_reached = true;
                info!(
                    "Child {} reached goal '{}' ({} stars)",
                    child.name, goal.name, new_star_total
                );
                // Redemption stays an explicit user action; we only announce.
                self.celebrations.celebrate(Celebration::GoalReached {
                    child_id: child.id.clone(),
                    child_name: child.name.clone(),
                    reward_id: goal.id.clone(),
                    reward_name: goal.name.clone(),
                    star_total: new_star_total,
                });
            }
        }

        Ok(LogBehaviorOutput {
            event,
            new_star_total,
            earned_badge,
            milestone,
            goal_reached,
        })
    }
}
