//! Store owning the behavior type catalog and the logged event history.
//!
//! Mutations write through to the repositories first and refresh the caches
//! afterwards. The star total is always recomputed read-through from the
//! repository, never served from a stored number.

use chrono::{Local, Utc};
use log::info;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::commands::behavior::{
    CreateBehaviorEventCommand, CreateBehaviorTypeCommand, UpdateBehaviorEventCommand,
    UpdateBehaviorTypeCommand,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::behavior::{BehaviorCategory, BehaviorEvent, BehaviorType};
use crate::domain::preferences::FamilyPreferences;
use crate::storage::traits::{BehaviorEventStorage, BehaviorTypeStorage};

const MAX_NAME_LENGTH: usize = 100;

pub struct BehaviorsStore {
    type_repository: Arc<dyn BehaviorTypeStorage>,
    event_repository: Arc<dyn BehaviorEventStorage>,
    preferences: FamilyPreferences,
    types: Mutex<Vec<BehaviorType>>,
    events: Mutex<Vec<BehaviorEvent>>,
}

impl BehaviorsStore {
    /// Create a new BehaviorsStore, loading both caches from the repositories
    pub fn new(
        type_repository: Arc<dyn BehaviorTypeStorage>,
        event_repository: Arc<dyn BehaviorEventStorage>,
        preferences: FamilyPreferences,
    ) -> DomainResult<Self> {
        let types = type_repository
            .get_behavior_types()
            .map_err(DomainError::persistence)?;
        let events = event_repository
            .get_events()
            .map_err(DomainError::persistence)?;
        Ok(Self {
            type_repository,
            event_repository,
            preferences,
            types: Mutex::new(types),
            events: Mutex::new(events),
        })
    }

    // --- Behavior type catalog ---

    /// Add a behavior type to the catalog
    pub fn add_type(&self, command: CreateBehaviorTypeCommand) -> DomainResult<BehaviorType> {
        let name = validated_name(&command.name)?;
        validate_points(command.category, command.default_points)?;
        info!("Creating behavior type: {}", name);

        let now = Utc::now();
        let behavior_type = BehaviorType {
            id: BehaviorType::generate_id(),
            name,
            category: command.category,
            default_points: command.default_points,
            active: true,
            created_at: now,
            updated_at: now,
        };

        self.type_repository
            .add_behavior_type(&behavior_type)
            .map_err(DomainError::persistence)?;
        self.refresh_types()?;

        Ok(behavior_type)
    }

    /// Update a behavior type's mutable attributes (identity and category
    /// are fixed)
    pub fn update_type(&self, command: UpdateBehaviorTypeCommand) -> DomainResult<BehaviorType> {
        let mut behavior_type = self
            .get_type(&command.behavior_type_id)
            .ok_or_else(|| DomainError::not_found("behavior"))?;

        if let Some(name) = command.name {
            behavior_type.name = validated_name(&name)?;
        }
        if let Some(default_points) = command.default_points {
            validate_points(behavior_type.category, default_points)?;
            behavior_type.default_points = default_points;
        }
        if let Some(active) = command.active {
            behavior_type.active = active;
        }
        behavior_type.updated_at = Utc::now();

        self.type_repository
            .update_behavior_type(&behavior_type)
            .map_err(DomainError::persistence)?;
        self.refresh_types()?;

        Ok(behavior_type)
    }

    /// Delete a behavior type. Refused while logged events reference it;
    /// deactivate it instead.
    pub fn delete_type(&self, behavior_type_id: &str) -> DomainResult<()> {
        self.get_type(behavior_type_id)
            .ok_or_else(|| DomainError::not_found("behavior"))?;

        let referenced = self
            .events
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.behavior_type_id == behavior_type_id);
        if referenced {
            return Err(DomainError::validation(
                "This behavior has logged history and cannot be deleted; deactivate it instead",
            ));
        }

        self.type_repository
            .delete_behavior_type(behavior_type_id)
            .map_err(DomainError::persistence)?;
        self.refresh_types()?;
        Ok(())
    }

    /// Get a behavior type by ID
    pub fn get_type(&self, behavior_type_id: &str) -> Option<BehaviorType> {
        self.types
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == behavior_type_id)
            .cloned()
    }

    /// The full catalog, active and inactive
    pub fn all_types(&self) -> Vec<BehaviorType> {
        self.types.lock().unwrap().clone()
    }

    /// Active catalog entries, ordered by name
    pub fn active_types(&self) -> Vec<BehaviorType> {
        let mut types: Vec<BehaviorType> = self
            .types
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.active)
            .cloned()
            .collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    // --- Behavior events ---

    /// Record a behavior event. The referenced type must exist; the sign of
    /// `points_applied` must match the type's category.
    pub fn add_event(&self, command: CreateBehaviorEventCommand) -> DomainResult<BehaviorEvent> {
        let behavior_type = self
            .get_type(&command.behavior_type_id)
            .ok_or_else(|| DomainError::not_found("behavior"))?;
        validate_points(behavior_type.category, command.points_applied)?;

        let event = BehaviorEvent {
            id: BehaviorEvent::generate_id(),
            child_id: command.child_id,
            behavior_type_id: command.behavior_type_id,
            occurred_at: command.occurred_at.unwrap_or_else(Utc::now),
            points_applied: command.points_applied,
            note: command.note,
            logged_by: command.logged_by,
            media_refs: command.media_refs,
        };

        self.event_repository
            .add_event(&event)
            .map_err(DomainError::persistence)?;
        self.refresh_events()?;

        info!(
            "Logged '{}' for child {}: {} points",
            behavior_type.name, event.child_id, event.points_applied
        );
        Ok(event)
    }

    /// Edit a logged event (explicit user action)
    pub fn update_event(&self, command: UpdateBehaviorEventCommand) -> DomainResult<BehaviorEvent> {
        let mut event = self
            .get_event(&command.event_id)
            .ok_or_else(|| DomainError::not_found("event"))?;

        if let Some(points_applied) = command.points_applied {
            let behavior_type = self
                .get_type(&event.behavior_type_id)
                .ok_or_else(|| DomainError::not_found("behavior"))?;
            validate_points(behavior_type.category, points_applied)?;
            event.points_applied = points_applied;
        }
        if let Some(note) = command.note {
            event.note = Some(note);
        }

        self.event_repository
            .update_event(&event)
            .map_err(DomainError::persistence)?;
        self.refresh_events()?;

        Ok(event)
    }

    /// Remove a logged event (explicit user action)
    pub fn delete_event(&self, event_id: &str) -> DomainResult<()> {
        let removed = self
            .event_repository
            .delete_event(event_id)
            .map_err(DomainError::persistence)?;
        if !removed {
            return Err(DomainError::not_found("event"));
        }
        self.refresh_events()?;
        Ok(())
    }

    /// Get an event by ID
    pub fn get_event(&self, event_id: &str) -> Option<BehaviorEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
    }

    /// All events for a child, oldest first
    pub fn events_for_child(&self, child_id: &str) -> Vec<BehaviorEvent> {
        let mut events: Vec<BehaviorEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.child_id == child_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.occurred_at);
        events
    }

    /// Events whose timestamp falls within the current local calendar day
    pub fn today_events(&self) -> Vec<BehaviorEvent> {
        let today = Local::now().date_naive();
        let mut events: Vec<BehaviorEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.occurred_at.with_timezone(&Local).date_naive() == today)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.occurred_at);
        events
    }

    /// Today's events for one child
    pub fn today_events_for_child(&self, child_id: &str) -> Vec<BehaviorEvent> {
        self.today_events()
            .into_iter()
            .filter(|e| e.child_id == child_id)
            .collect()
    }

    /// Recompute a child's star total as the sum of `points_applied` over
    /// all of their events, read straight from the repository.
    pub fn star_total(&self, child_id: &str) -> DomainResult<i64> {
        let events = self
            .event_repository
            .get_events()
            .map_err(DomainError::persistence)?;
        Ok(events
            .iter()
            .filter(|e| e.child_id == child_id)
            .map(|e| e.points_applied)
            .sum())
    }

    /// Rank the active behavior types for the quick-log surface.
    ///
    /// Types the child logged recently are deprioritized, as are categories
    /// over-represented in the recent events; ties break by name. The
    /// ranking is deterministic for identical inputs.
    pub fn suggested_behaviors(
        &self,
        child_id: &str,
        recent_events: &[BehaviorEvent],
    ) -> Vec<BehaviorType> {
        let window = self.preferences.suggestion_recent_window;
        let recent: Vec<&BehaviorEvent> = recent_events.iter().rev().take(window).collect();

        let categories: HashMap<String, BehaviorCategory> = self
            .types
            .lock()
            .unwrap()
            .iter()
            .map(|t| (t.id.clone(), t.category))
            .collect();

        let mut type_counts: HashMap<&str, usize> = HashMap::new();
        let mut category_counts: HashMap<BehaviorCategory, usize> = HashMap::new();
        for event in &recent {
            if event.child_id == child_id {
                *type_counts.entry(event.behavior_type_id.as_str()).or_default() += 1;
            }
            if let Some(category) = categories.get(&event.behavior_type_id) {
                *category_counts.entry(*category).or_default() += 1;
            }
        }

        let mut candidates = self.active_types();
        candidates.sort_by(|a, b| {
            let score = |t: &BehaviorType| {
                type_counts.get(t.id.as_str()).copied().unwrap_or(0) * 2
                    + category_counts.get(&t.category).copied().unwrap_or(0)
            };
            score(a).cmp(&score(b)).then_with(|| a.name.cmp(&b.name))
        });
        candidates.truncate(self.preferences.suggestion_limit);
        candidates
    }

    fn refresh_types(&self) -> DomainResult<()> {
        let types = self
            .type_repository
            .get_behavior_types()
            .map_err(DomainError::persistence)?;
        *self.types.lock().unwrap() = types;
        Ok(())
    }

    fn refresh_events(&self) -> DomainResult<()> {
        let events = self
            .event_repository
            .get_events()
            .map_err(DomainError::persistence)?;
        *self.events.lock().unwrap() = events;
        Ok(())
    }
}

fn validated_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Behavior name cannot be empty"));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(
            "Behavior name cannot exceed 100 characters",
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_points(category: BehaviorCategory, points: i64) -> DomainResult<()> {
    if category.expects_positive_points() && points <= 0 {
        return Err(DomainError::validation(format!(
            "A {} behavior must award at least one star",
            category.label()
        )));
    }
    if !category.expects_positive_points() && points >= 0 {
        return Err(DomainError::validation(
            "A negative behavior must take stars away",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::{BehaviorEventRepository, BehaviorTypeRepository, JsonConnection};
    use chrono::Duration;
    use tempfile::TempDir;

    fn setup_test() -> (BehaviorsStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        let store = BehaviorsStore::new(
            Arc::new(BehaviorTypeRepository::new(connection.clone())),
            Arc::new(BehaviorEventRepository::new(connection)),
            FamilyPreferences::default(),
        )
        .unwrap();
        (store, temp_dir)
    }

    fn create_type(
        store: &BehaviorsStore,
        name: &str,
        category: BehaviorCategory,
        default_points: i64,
    ) -> BehaviorType {
        store
            .add_type(CreateBehaviorTypeCommand {
                name: name.to_string(),
                category,
                default_points,
            })
            .unwrap()
    }

    fn log_event(
        store: &BehaviorsStore,
        child_id: &str,
        behavior_type_id: &str,
        points: i64,
    ) -> BehaviorEvent {
        store
            .add_event(CreateBehaviorEventCommand {
                child_id: child_id.to_string(),
                behavior_type_id: behavior_type_id.to_string(),
                points_applied: points,
                occurred_at: None,
                note: None,
                logged_by: None,
                media_refs: Vec::new(),
            })
            .unwrap()
    }

    #[test]
    fn test_type_point_sign_validation() {
        let (store, _temp_dir) = setup_test();

        let err = store
            .add_type(CreateBehaviorTypeCommand {
                name: "Shared toys".to_string(),
                category: BehaviorCategory::Positive,
                default_points: -2,
            })
            .unwrap_err();
        assert!(err.is_validation());

        let err = store
            .add_type(CreateBehaviorTypeCommand {
                name: "Hit sibling".to_string(),
                category: BehaviorCategory::Negative,
                default_points: 3,
            })
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_event_requires_existing_type() {
        let (store, _temp_dir) = setup_test();
        let err = store
            .add_event(CreateBehaviorEventCommand {
                child_id: "child::a".to_string(),
                behavior_type_id: "behavior::ghost".to_string(),
                points_applied: 1,
                occurred_at: None,
                note: None,
                logged_by: None,
                media_refs: Vec::new(),
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_event_point_sign_must_match_category() {
        let (store, _temp_dir) = setup_test();
        let bt = create_type(&store, "Shared toys", BehaviorCategory::Positive, 2);

        let err = store
            .add_event(CreateBehaviorEventCommand {
                child_id: "child::a".to_string(),
                behavior_type_id: bt.id,
                points_applied: -1,
                occurred_at: None,
                note: None,
                logged_by: None,
                media_refs: Vec::new(),
            })
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.events_for_child("child::a").is_empty());
    }

    #[test]
    fn test_star_total_is_sum_of_points_applied() {
        let (store, _temp_dir) = setup_test();
        let good = create_type(&store, "Shared toys", BehaviorCategory::Positive, 2);
        let bad = create_type(&store, "Hit sibling", BehaviorCategory::Negative, -3);

        log_event(&store, "child::a", &good.id, 2);
        log_event(&store, "child::a", &good.id, 5);
        log_event(&store, "child::a", &bad.id, -3);
        log_event(&store, "child::b", &good.id, 7);

        assert_eq!(store.star_total("child::a").unwrap(), 4);
        assert_eq!(store.star_total("child::b").unwrap(), 7);
        assert_eq!(store.star_total("child::nobody").unwrap(), 0);
    }

    #[test]
    fn test_today_events_filters_by_local_day() {
        let (store, _temp_dir) = setup_test();
        let bt = create_type(&store, "Brushed teeth", BehaviorCategory::RoutinePositive, 1);

        log_event(&store, "child::a", &bt.id, 1);
        store
            .add_event(CreateBehaviorEventCommand {
                child_id: "child::a".to_string(),
                behavior_type_id: bt.id.clone(),
                points_applied: 1,
                occurred_at: Some(Utc::now() - Duration::days(3)),
                note: None,
                logged_by: None,
                media_refs: Vec::new(),
            })
            .unwrap();

        assert_eq!(store.events_for_child("child::a").len(), 2);
        assert_eq!(store.today_events().len(), 1);
        assert_eq!(store.today_events_for_child("child::a").len(), 1);
        assert!(store.today_events_for_child("child::b").is_empty());
    }

    #[test]
    fn test_delete_type_refused_while_events_reference_it() {
        let (store, _temp_dir) = setup_test();
        let bt = create_type(&store, "Shared toys", BehaviorCategory::Positive, 2);
        log_event(&store, "child::a", &bt.id, 2);

        let err = store.delete_type(&bt.id).unwrap_err();
        assert!(err.is_validation());

        // Deactivating still works
        let updated = store
            .update_type(UpdateBehaviorTypeCommand {
                behavior_type_id: bt.id.clone(),
                name: None,
                default_points: None,
                active: Some(false),
            })
            .unwrap();
        assert!(!updated.active);
        assert!(store.active_types().is_empty());
    }

    #[test]
    fn test_update_and_delete_event() {
        let (store, _temp_dir) = setup_test();
        let bt = create_type(&store, "Shared toys", BehaviorCategory::Positive, 2);
        let event = log_event(&store, "child::a", &bt.id, 2);

        let updated = store
            .update_event(UpdateBehaviorEventCommand {
                event_id: event.id.clone(),
                points_applied: Some(4),
                note: Some("went above and beyond".to_string()),
            })
            .unwrap();
        assert_eq!(updated.points_applied, 4);
        assert_eq!(store.star_total("child::a").unwrap(), 4);

        store.delete_event(&event.id).unwrap();
        assert_eq!(store.star_total("child::a").unwrap(), 0);
        assert!(store.delete_event(&event.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_suggestions_are_deterministic() {
        let (store, _temp_dir) = setup_test();
        create_type(&store, "Shared toys", BehaviorCategory::Positive, 2);
        create_type(&store, "Brushed teeth", BehaviorCategory::RoutinePositive, 1);
        create_type(&store, "Helped cook", BehaviorCategory::Positive, 3);

        let recent = store.events_for_child("child::a");
        let first = store.suggested_behaviors("child::a", &recent);
        let second = store.suggested_behaviors("child::a", &recent);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_suggestions_deprioritize_recently_logged_type() {
        let (store, _temp_dir) = setup_test();
        let shared = create_type(&store, "Shared toys", BehaviorCategory::Positive, 2);
        let teeth = create_type(&store, "Brushed teeth", BehaviorCategory::RoutinePositive, 1);

        // With no history, ties break alphabetically
        let fresh = store.suggested_behaviors("child::a", &[]);
        assert_eq!(fresh[0].id, teeth.id);

        // Log the routine repeatedly; it should drop below the other type
        for _ in 0..3 {
            log_event(&store, "child::a", &teeth.id, 1);
        }
        let recent = store.events_for_child("child::a");
        let ranked = store.suggested_behaviors("child::a", &recent);
        assert_eq!(ranked[0].id, shared.id);
        assert_eq!(ranked[1].id, teeth.id);
    }

    #[test]
    fn test_suggestions_exclude_inactive_types() {
        let (store, _temp_dir) = setup_test();
        let bt = create_type(&store, "Shared toys", BehaviorCategory::Positive, 2);
        store
            .update_type(UpdateBehaviorTypeCommand {
                behavior_type_id: bt.id,
                name: None,
                default_points: None,
                active: Some(false),
            })
            .unwrap();

        assert!(store.suggested_behaviors("child::a", &[]).is_empty());
    }
}
