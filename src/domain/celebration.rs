//! Celebration surface: the outward-facing channel the logging workflow
//! emits goal, milestone and badge events to. The crate only guarantees the
//! payloads are fully populated; rendering is the consumer's concern.

use log::debug;

use crate::domain::models::progression::{Badge, Milestone};

/// A discrete event worth celebrating in the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Celebration {
    GoalReached {
        child_id: String,
        child_name: String,
        reward_id: String,
        reward_name: String,
        star_total: i64,
    },
    MilestoneReached(Milestone),
    BadgeEarned(Badge),
}

pub trait CelebrationSink: Send + Sync {
    fn celebrate(&self, celebration: Celebration);
}

/// Sink that drops every celebration; used when no UI surface is attached.
pub struct NullCelebrationSink;

impl CelebrationSink for NullCelebrationSink {
    fn celebrate(&self, celebration: Celebration) {
        debug!("Celebration discarded (no sink attached): {:?}", celebration);
    }
}
