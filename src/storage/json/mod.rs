//! # JSON Storage Module
//!
//! File-based storage for the star tracker: one JSON array file per entity
//! family under a single data directory, written atomically via a temp file
//! so a failed write never corrupts existing data.
//!
//! Files:
//! - `children.json`
//! - `behavior_types.json`
//! - `behavior_events.json`
//! - `rewards.json`
//! - `reward_history.json`

pub mod behavior_repository;
pub mod child_repository;
pub mod connection;
pub mod reward_repository;

pub use behavior_repository::{BehaviorEventRepository, BehaviorTypeRepository};
pub use child_repository::ChildRepository;
pub use connection::JsonConnection;
pub use reward_repository::{RewardHistoryRepository, RewardRepository};
