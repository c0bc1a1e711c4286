//! # Domain Module
//!
//! Business logic for the star tracker. Each store owns one entity family
//! and is independently testable; the logging use case coordinates them
//! into a single transaction. All execution is synchronous on the caller's
//! thread; each store serializes its own mutations to keep read-after-write
//! consistency against the single local source of truth.

pub mod behaviors_store;
pub mod celebration;
pub mod children_store;
pub mod commands;
pub mod errors;
pub mod log_behavior;
pub mod models;
pub mod preferences;
pub mod progression_store;
pub mod rewards_store;

pub use behaviors_store::BehaviorsStore;
pub use celebration::{Celebration, CelebrationSink, NullCelebrationSink};
pub use children_store::ChildrenStore;
pub use errors::{DomainError, DomainResult};
pub use log_behavior::LogBehaviorUseCase;
pub use preferences::{BadgeRule, FamilyPreferences};
pub use progression_store::ProgressionStore;
pub use rewards_store::RewardsStore;
