//! JSON-backed repositories for the behavior catalog and logged events.

use anyhow::{anyhow, Result};
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::{load_collection, store_collection, JsonConnection};
use crate::domain::models::behavior::{BehaviorEvent, BehaviorType};
use crate::storage::traits::{BehaviorEventStorage, BehaviorTypeStorage};

const BEHAVIOR_TYPES_FILE: &str = "behavior_types.json";
const BEHAVIOR_EVENTS_FILE: &str = "behavior_events.json";

/// JSON-backed repository for the behavior type catalog
#[derive(Clone)]
pub struct BehaviorTypeRepository {
    connection: Arc<JsonConnection>,
}

impl BehaviorTypeRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn file_path(&self) -> PathBuf {
        self.connection.collection_path(BEHAVIOR_TYPES_FILE)
    }
}

impl BehaviorTypeStorage for BehaviorTypeRepository {
    fn add_behavior_type(&self, behavior_type: &BehaviorType) -> Result<()> {
        let mut types: Vec<BehaviorType> = load_collection(&self.file_path())?;
        if types.iter().any(|t| t.id == behavior_type.id) {
            return Err(anyhow!("behavior type already exists: {}", behavior_type.id));
        }
        types.push(behavior_type.clone());
        store_collection(&self.file_path(), &types)?;
        debug!("Stored behavior type {} ({})", behavior_type.name, behavior_type.id);
        Ok(())
    }

    fn get_behavior_types(&self) -> Result<Vec<BehaviorType>> {
        load_collection(&self.file_path())
    }

    fn update_behavior_type(&self, behavior_type: &BehaviorType) -> Result<()> {
        let mut types: Vec<BehaviorType> = load_collection(&self.file_path())?;
        match types.iter_mut().find(|t| t.id == behavior_type.id) {
            Some(existing) => *existing = behavior_type.clone(),
            None => {
                warn!("Attempted to update a non-existent behavior type: {}", behavior_type.id);
                return Err(anyhow!("behavior type not found for update: {}", behavior_type.id));
            }
        }
        store_collection(&self.file_path(), &types)
    }

    fn delete_behavior_type(&self, behavior_type_id: &str) -> Result<bool> {
        let mut types: Vec<BehaviorType> = load_collection(&self.file_path())?;
        let before = types.len();
        types.retain(|t| t.id != behavior_type_id);
        if types.len() == before {
            return Ok(false);
        }
        store_collection(&self.file_path(), &types)?;
        Ok(true)
    }
}

/// JSON-backed repository for logged behavior events
#[derive(Clone)]
pub struct BehaviorEventRepository {
    connection: Arc<JsonConnection>,
}

impl BehaviorEventRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn file_path(&self) -> PathBuf {
        self.connection.collection_path(BEHAVIOR_EVENTS_FILE)
    }
}

impl BehaviorEventStorage for BehaviorEventRepository {
    fn add_event(&self, event: &BehaviorEvent) -> Result<()> {
        let mut events: Vec<BehaviorEvent> = load_collection(&self.file_path())?;
        if events.iter().any(|e| e.id == event.id) {
            return Err(anyhow!("behavior event already exists: {}", event.id));
        }
        events.push(event.clone());
        store_collection(&self.file_path(), &events)?;
        debug!(
            "Stored behavior event {} for child {} ({} points)",
            event.id, event.child_id, event.points_applied
        );
        Ok(())
    }

    fn get_events(&self) -> Result<Vec<BehaviorEvent>> {
        load_collection(&self.file_path())
    }

    fn update_event(&self, event: &BehaviorEvent) -> Result<()> {
        let mut events: Vec<BehaviorEvent> = load_collection(&self.file_path())?;
        match events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => *existing = event.clone(),
            None => {
                warn!("Attempted to update a non-existent behavior event: {}", event.id);
                return Err(anyhow!("behavior event not found for update: {}", event.id));
            }
        }
        store_collection(&self.file_path(), &events)
    }

    fn delete_event(&self, event_id: &str) -> Result<bool> {
        let mut events: Vec<BehaviorEvent> = load_collection(&self.file_path())?;
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Ok(false);
        }
        store_collection(&self.file_path(), &events)?;
        Ok(true)
    }
}
