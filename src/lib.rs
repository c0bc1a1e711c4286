//! # Star Chart
//!
//! Core engine for a family behavior and reward tracker: parents log
//! positive, negative and routine behaviors for their children; children
//! earn stars toward rewards; the engine derives badges, milestones and an
//! activity streak from the event history.
//!
//! ## Architecture
//!
//! ```text
//! UI layer (not part of this crate)
//!     ↓
//! Use case (LogBehaviorUseCase: one logging transaction)
//!     ↓
//! Domain stores (children, behaviors, rewards, progression)
//!     ↓
//! Storage layer (JSON files behind storage traits)
//! ```
//!
//! Everything is constructor-injected; [`initialize_app`] composes the
//! repositories, stores and use case in dependency order.

pub mod domain;
pub mod storage;

use anyhow::Result;
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::domain::behaviors_store::BehaviorsStore;
use crate::domain::celebration::CelebrationSink;
use crate::domain::children_store::ChildrenStore;
use crate::domain::log_behavior::LogBehaviorUseCase;
use crate::domain::preferences::FamilyPreferences;
use crate::domain::progression_store::ProgressionStore;
use crate::domain::rewards_store::RewardsStore;
use crate::storage::json::{
    BehaviorEventRepository, BehaviorTypeRepository, ChildRepository, JsonConnection,
    RewardHistoryRepository, RewardRepository,
};

/// Main application state holding all stores and the logging use case
pub struct AppState {
    pub children_store: Arc<ChildrenStore>,
    pub behaviors_store: Arc<BehaviorsStore>,
    pub rewards_store: Arc<RewardsStore>,
    pub progression_store: Arc<ProgressionStore>,
    pub log_behavior: LogBehaviorUseCase,
}

/// Initialize the engine against a data directory, wiring repositories,
/// stores and the use case in dependency order.
pub fn initialize_app<P: AsRef<Path>>(
    base_directory: P,
    preferences: FamilyPreferences,
    celebrations: Arc<dyn CelebrationSink>,
) -> Result<AppState> {
    info!("Setting up data directory");
    let connection = Arc::new(JsonConnection::new(base_directory)?);

    let child_repository = Arc::new(ChildRepository::new(connection.clone()));
    let type_repository = Arc::new(BehaviorTypeRepository::new(connection.clone()));
    let event_repository = Arc::new(BehaviorEventRepository::new(connection.clone()));
    let reward_repository = Arc::new(RewardRepository::new(connection.clone()));
    let history_repository = Arc::new(RewardHistoryRepository::new(connection));

    info!("Setting up domain stores");
    let children_store = Arc::new(ChildrenStore::new(
        child_repository,
        event_repository.clone(),
    )?);
    let behaviors_store = Arc::new(BehaviorsStore::new(
        type_repository,
        event_repository,
        preferences.clone(),
    )?);
    let rewards_store = Arc::new(RewardsStore::new(reward_repository, history_repository)?);
    let progression_store = Arc::new(ProgressionStore::new(preferences));

    let log_behavior = LogBehaviorUseCase::new(
        children_store.clone(),
        behaviors_store.clone(),
        rewards_store.clone(),
        progression_store.clone(),
        celebrations,
    );

    Ok(AppState {
        children_store,
        behaviors_store,
        rewards_store,
        progression_store,
        log_behavior,
    })
}
