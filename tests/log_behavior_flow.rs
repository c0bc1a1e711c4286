//! End-to-end scenarios for the behavior-logging workflow, running against
//! the real JSON storage in a temporary data directory.

use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use star_chart::domain::commands::behavior::CreateBehaviorTypeCommand;
use star_chart::domain::commands::child::CreateChildCommand;
use star_chart::domain::commands::logging::LogBehaviorCommand;
use star_chart::domain::commands::reward::CreateRewardCommand;
use star_chart::domain::models::behavior::{BehaviorCategory, BehaviorType};
use star_chart::domain::models::child::Child;
use star_chart::domain::models::reward::Reward;
use star_chart::domain::{Celebration, CelebrationSink, DomainError, FamilyPreferences};
use star_chart::{initialize_app, AppState};

/// Sink that records every celebration it receives
#[derive(Default)]
struct RecordingSink {
    received: Mutex<Vec<Celebration>>,
}

impl RecordingSink {
    fn celebrations(&self) -> Vec<Celebration> {
        self.received.lock().unwrap().clone()
    }
}

impl CelebrationSink for RecordingSink {
    fn celebrate(&self, celebration: Celebration) {
        self.received.lock().unwrap().push(celebration);
    }
}

struct TestApp {
    state: AppState,
    sink: Arc<RecordingSink>,
    _temp_dir: TempDir,
}

fn setup_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let sink = Arc::new(RecordingSink::default());
    let state = initialize_app(
        temp_dir.path(),
        FamilyPreferences::default(),
        sink.clone(),
    )
    .unwrap();
    TestApp {
        state,
        sink,
        _temp_dir: temp_dir,
    }
}

fn create_child(app: &TestApp, name: &str) -> Child {
    app.state
        .children_store
        .add(CreateChildCommand {
            name: name.to_string(),
            birthdate: None,
            color_tag: "teal".to_string(),
        })
        .unwrap()
}

fn create_behavior(app: &TestApp, name: &str, points: i64) -> BehaviorType {
    app.state
        .behaviors_store
        .add_type(CreateBehaviorTypeCommand {
            name: name.to_string(),
            category: BehaviorCategory::Positive,
            default_points: points,
        })
        .unwrap()
}

fn create_goal(app: &TestApp, child: &Child, name: &str, target: i64) -> Reward {
    app.state
        .rewards_store
        .add(CreateRewardCommand {
            child_id: child.id.clone(),
            name: name.to_string(),
            target_points: target,
            priority: 1,
        })
        .unwrap()
}

fn log(app: &TestApp, child: &Child, behavior: &BehaviorType, points: i64) -> star_chart::domain::commands::logging::LogBehaviorOutput {
    app.state
        .log_behavior
        .execute(LogBehaviorCommand {
            child_id: child.id.clone(),
            behavior_type_id: behavior.id.clone(),
            points_applied: points,
            note: None,
            logged_by: Some("parent::mom".to_string()),
            media_refs: Vec::new(),
        })
        .unwrap()
}

#[test]
fn goal_is_reached_exactly_when_total_crosses_target() {
    let app = setup_app();
    let child = create_child(&app, "Maya");
    let behavior = create_behavior(&app, "Shared toys", 2);
    let goal = create_goal(&app, &child, "Sticker book", 5);

    // 2 stars: 40% of target, nothing fires
    let first = log(&app, &child, &behavior, 2);
    assert_eq!(first.new_star_total, 2);
    assert!(!first.goal_reached);
    assert!(first.milestone.is_none());

    // 4 stars: crosses the 50% milestone, goal not yet reached
    let second = log(&app, &child, &behavior, 2);
    assert_eq!(second.new_star_total, 4);
    assert!(!second.goal_reached);
    let milestone = second.milestone.expect("50% milestone should fire");
    assert_eq!(milestone.threshold_percent, 50);
    assert_eq!(milestone.reward_id, goal.id);

    // 6 stars: crosses 100%, goal reached exactly now
    let third = log(&app, &child, &behavior, 2);
    assert_eq!(third.new_star_total, 6);
    assert!(third.goal_reached);
    let milestone = third.milestone.expect("100% milestone should fire");
    assert_eq!(milestone.threshold_percent, 100);

    // The goal-reached celebration was emitted once, with a full payload
    let goal_celebrations: Vec<_> = app
        .sink
        .celebrations()
        .into_iter()
        .filter(|c| matches!(c, Celebration::GoalReached { .. }))
        .collect();
    assert_eq!(goal_celebrations.len(), 1);
    if let Celebration::GoalReached {
        child_name,
        reward_name,
        star_total,
        ..
    } = &goal_celebrations[0]
    {
        assert_eq!(child_name, "Maya");
        assert_eq!(reward_name, "Sticker book");
        assert_eq!(*star_total, 6);
    }

    // Reaching the goal did not auto-redeem the reward
    let stored_goal = app.state.rewards_store.get(&goal.id).unwrap();
    assert!(!stored_goal.redeemed);
}

#[test]
fn milestone_for_a_threshold_fires_only_once() {
    let app = setup_app();
    let child = create_child(&app, "Maya");
    let behavior = create_behavior(&app, "Shared toys", 2);
    create_goal(&app, &child, "Sticker book", 5);

    for _ in 0..3 {
        log(&app, &child, &behavior, 2);
    }
    // More events past the target must not re-report the crossing
    let fourth = log(&app, &child, &behavior, 2);
    assert!(fourth.milestone.is_none());
    assert!(fourth.goal_reached);

    let milestone_count = app
        .sink
        .celebrations()
        .iter()
        .filter(|c| matches!(c, Celebration::MilestoneReached(m) if m.threshold_percent == 100))
        .count();
    assert_eq!(milestone_count, 1);
}

#[test]
fn logging_against_archived_child_fails_and_persists_nothing() {
    let app = setup_app();
    let child = create_child(&app, "Maya");
    let behavior = create_behavior(&app, "Shared toys", 2);
    app.state.children_store.archive(&child.id).unwrap();

    let err = app
        .state
        .log_behavior
        .execute(LogBehaviorCommand {
            child_id: child.id.clone(),
            behavior_type_id: behavior.id.clone(),
            points_applied: 2,
            note: None,
            logged_by: None,
            media_refs: Vec::new(),
        })
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { .. }));
    assert!(app.state.behaviors_store.events_for_child(&child.id).is_empty());
    assert_eq!(app.state.behaviors_store.star_total(&child.id).unwrap(), 0);
    assert!(app.sink.celebrations().is_empty());
}

#[test]
fn logging_unknown_behavior_type_fails_not_found() {
    let app = setup_app();
    let child = create_child(&app, "Maya");

    let err = app
        .state
        .log_behavior
        .execute(LogBehaviorCommand {
            child_id: child.id.clone(),
            behavior_type_id: "behavior::ghost".to_string(),
            points_applied: 2,
            note: None,
            logged_by: None,
            media_refs: Vec::new(),
        })
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[test]
fn star_total_always_equals_sum_of_applied_points() {
    let app = setup_app();
    let child = create_child(&app, "Maya");
    let behavior = create_behavior(&app, "Shared toys", 2);
    let setback = app
        .state
        .behaviors_store
        .add_type(CreateBehaviorTypeCommand {
            name: "Skipped chores".to_string(),
            category: BehaviorCategory::Negative,
            default_points: -1,
        })
        .unwrap();

    let mut expected = 0i64;
    for points in [2, 3, 2] {
        let output = log(&app, &child, &behavior, points);
        expected += points;
        assert_eq!(output.new_star_total, expected);
    }
    let output = log(&app, &child, &setback, -1);
    expected -= 1;
    assert_eq!(output.new_star_total, expected);

    let events = app.state.behaviors_store.events_for_child(&child.id);
    let summed: i64 = events.iter().map(|e| e.points_applied).sum();
    assert_eq!(summed, expected);
}

#[test]
fn first_positive_event_earns_the_first_badge() {
    let app = setup_app();
    let child = create_child(&app, "Maya");
    let behavior = create_behavior(&app, "Shared toys", 2);

    // Default rules include "First Star" after one positive event
    let output = log(&app, &child, &behavior, 2);
    let badge = output.earned_badge.expect("first badge should be earned");
    assert_eq!(badge.rule_id, "first-star");

    let badge_celebrations = app
        .sink
        .celebrations()
        .iter()
        .filter(|c| matches!(c, Celebration::BadgeEarned(_)))
        .count();
    assert_eq!(badge_celebrations, 1);

    // Logging again must not re-award the same badge
    let again = log(&app, &child, &behavior, 2);
    assert!(again.earned_badge.is_none());
}

#[test]
fn logging_without_a_goal_reports_no_goal_or_milestone() {
    let app = setup_app();
    let child = create_child(&app, "Maya");
    let behavior = create_behavior(&app, "Shared toys", 2);

    let output = log(&app, &child, &behavior, 2);
    assert!(!output.goal_reached);
    assert!(output.milestone.is_none());
}

#[test]
fn data_survives_reinitialization() {
    let temp_dir = TempDir::new().unwrap();
    let sink = Arc::new(RecordingSink::default());

    let child_id = {
        let state = initialize_app(
            temp_dir.path(),
            FamilyPreferences::default(),
            sink.clone(),
        )
        .unwrap();
        let child = state
            .children_store
            .add(CreateChildCommand {
                name: "Maya".to_string(),
                birthdate: None,
                color_tag: "teal".to_string(),
            })
            .unwrap();
        let behavior = state
            .behaviors_store
            .add_type(CreateBehaviorTypeCommand {
                name: "Shared toys".to_string(),
                category: BehaviorCategory::Positive,
                default_points: 2,
            })
            .unwrap();
        state
            .log_behavior
            .execute(LogBehaviorCommand {
                child_id: child.id.clone(),
                behavior_type_id: behavior.id,
                points_applied: 2,
                note: None,
                logged_by: None,
                media_refs: Vec::new(),
            })
            .unwrap();
        child.id
    };

    // Fresh stores over the same directory see the same state
    let state = initialize_app(temp_dir.path(), FamilyPreferences::default(), sink).unwrap();
    assert!(state.children_store.get(&child_id).is_some());
    assert_eq!(state.behaviors_store.star_total(&child_id).unwrap(), 2);
}
