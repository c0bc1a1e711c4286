use anyhow::{anyhow, Result};
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::{load_collection, store_collection, JsonConnection};
use crate::domain::models::child::Child;
use crate::storage::traits::ChildStorage;

const CHILDREN_FILE: &str = "children.json";

/// JSON-backed child repository
#[derive(Clone)]
pub struct ChildRepository {
    connection: Arc<JsonConnection>,
}

impl ChildRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn file_path(&self) -> PathBuf {
        self.connection.collection_path(CHILDREN_FILE)
    }

    fn load(&self) -> Result<Vec<Child>> {
        load_collection(&self.file_path())
    }

    fn store(&self, children: &[Child]) -> Result<()> {
        store_collection(&self.file_path(), children)
    }
}

impl ChildStorage for ChildRepository {
    fn add_child(&self, child: &Child) -> Result<()> {
        let mut children = self.load()?;
        if children.iter().any(|c| c.id == child.id) {
            return Err(anyhow!("child already exists: {}", child.id));
        }
        children.push(child.clone());
        self.store(&children)?;
        debug!("Stored child {} ({})", child.name, child.id);
        Ok(())
    }

    fn get_children(&self) -> Result<Vec<Child>> {
        self.load()
    }

    fn update_child(&self, child: &Child) -> Result<()> {
        let mut children = self.load()?;
        match children.iter_mut().find(|c| c.id == child.id) {
            Some(existing) => *existing = child.clone(),
            None => {
                warn!("Attempted to update a non-existent child: {}", child.id);
                return Err(anyhow!("child not found for update: {}", child.id));
            }
        }
        self.store(&children)
    }

    fn delete_child(&self, child_id: &str) -> Result<bool> {
        let mut children = self.load()?;
        let before = children.len();
        children.retain(|c| c.id != child_id);
        if children.len() == before {
            return Ok(false);
        }
        self.store(&children)?;
        debug!("Deleted child {}", child_id);
        Ok(true)
    }
}
