//! Store owning the authoritative in-memory list of child profiles.
//!
//! Every mutation writes through to the repository first and refreshes the
//! cache from it afterwards, so a failed write leaves the cache untouched
//! and reads always reflect the single local source of truth.

use chrono::Utc;
use log::info;
use std::sync::{Arc, Mutex};

use crate::domain::commands::child::{CreateChildCommand, UpdateChildCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::child::Child;
use crate::storage::traits::{BehaviorEventStorage, ChildStorage};

const MAX_NAME_LENGTH: usize = 100;

pub struct ChildrenStore {
    repository: Arc<dyn ChildStorage>,
    event_storage: Arc<dyn BehaviorEventStorage>,
    cache: Mutex<Vec<Child>>,
}

impl ChildrenStore {
    /// Create a new ChildrenStore, loading the cache from the repository.
    /// The event storage handle backs the referential check in [`Self::delete`].
    pub fn new(
        repository: Arc<dyn ChildStorage>,
        event_storage: Arc<dyn BehaviorEventStorage>,
    ) -> DomainResult<Self> {
        let cache = repository.get_children().map_err(DomainError::persistence)?;
        Ok(Self {
            repository,
            event_storage,
            cache: Mutex::new(cache),
        })
    }

    /// Create a new child profile
    pub fn add(&self, command: CreateChildCommand) -> DomainResult<Child> {
        let name = validated_name(&command.name)?;
        info!("Creating child: {}", name);

        let now = Utc::now();
        let child = Child {
            id: Child::generate_id(),
            name,
            birthdate: command.birthdate,
            color_tag: command.color_tag,
            archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
        };

        self.repository
            .add_child(&child)
            .map_err(DomainError::persistence)?;
        self.refresh_cache()?;

        Ok(child)
    }

    /// Update a child's profile attributes
    pub fn update(&self, command: UpdateChildCommand) -> DomainResult<Child> {
        let mut child = self
            .get(&command.child_id)
            .ok_or_else(|| DomainError::not_found("child"))?;

        if let Some(name) = command.name {
            child.name = validated_name(&name)?;
        }
        if let Some(birthdate) = command.birthdate {
            child.birthdate = birthdate;
        }
        if let Some(color_tag) = command.color_tag {
            child.color_tag = color_tag;
        }
        child.updated_at = Utc::now();

        self.repository
            .update_child(&child)
            .map_err(DomainError::persistence)?;
        self.refresh_cache()?;

        Ok(child)
    }

    /// Soft-delete: mark the child archived. No cascading effect on events
    /// or rewards.
    pub fn archive(&self, child_id: &str) -> DomainResult<Child> {
        self.set_archived(child_id, true)
    }

    /// Bring an archived child back
    pub fn unarchive(&self, child_id: &str) -> DomainResult<Child> {
        self.set_archived(child_id, false)
    }

    fn set_archived(&self, child_id: &str, archived: bool) -> DomainResult<Child> {
        let mut child = self
            .get(child_id)
            .ok_or_else(|| DomainError::not_found("child"))?;

        let now = Utc::now();
        child.archived = archived;
        child.archived_at = archived.then_some(now);
        child.updated_at = now;

        self.repository
            .update_child(&child)
            .map_err(DomainError::persistence)?;
        self.refresh_cache()?;

        info!(
            "{} child: {} ({})",
            if archived { "Archived" } else { "Unarchived" },
            child.name,
            child.id
        );
        Ok(child)
    }

    /// Hard-delete a child. Refused while any behavior event references the
    /// child; the profile should be archived instead.
    pub fn delete(&self, child_id: &str) -> DomainResult<()> {
        let child = self
            .get(child_id)
            .ok_or_else(|| DomainError::not_found("child"))?;

        let events = self
            .event_storage
            .get_events()
            .map_err(DomainError::persistence)?;
        if events.iter().any(|e| e.child_id == child_id) {
            return Err(DomainError::validation(
                "This child has logged history and cannot be deleted; archive the profile instead",
            ));
        }

        self.repository
            .delete_child(child_id)
            .map_err(DomainError::persistence)?;
        self.refresh_cache()?;

        info!("Deleted child: {} ({})", child.name, child.id);
        Ok(())
    }

    /// Get a child by ID
    pub fn get(&self, child_id: &str) -> Option<Child> {
        self.cache
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == child_id)
            .cloned()
    }

    /// All non-archived children, ordered by name
    pub fn active_children(&self) -> Vec<Child> {
        self.filtered(false)
    }

    /// All archived children, ordered by name
    pub fn archived_children(&self) -> Vec<Child> {
        self.filtered(true)
    }

    fn filtered(&self, archived: bool) -> Vec<Child> {
        let mut children: Vec<Child> = self
            .cache
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.archived == archived)
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    fn refresh_cache(&self) -> DomainResult<()> {
        let children = self.repository.get_children().map_err(DomainError::persistence)?;
        *self.cache.lock().unwrap() = children;
        Ok(())
    }
}

fn validated_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Child name cannot be empty"));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(
            "Child name cannot exceed 100 characters",
        ));
    }
    Ok(trimmed.to_string())
}
