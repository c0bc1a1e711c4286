use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a behavior type. The category constrains the sign of the
/// point delta: positive categories award stars, negative ones remove them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorCategory {
    Positive,
    Negative,
    RoutinePositive,
}

impl BehaviorCategory {
    /// Human-readable label used in validation messages
    pub fn label(&self) -> &'static str {
        match self {
            BehaviorCategory::Positive => "positive",
            BehaviorCategory::Negative => "negative",
            BehaviorCategory::RoutinePositive => "routine",
        }
    }

    /// Whether point deltas for this category must be greater than zero
    pub fn expects_positive_points(&self) -> bool {
        !matches!(self, BehaviorCategory::Negative)
    }
}

/// A catalog entry parents can log against (e.g. "Brushed teeth").
/// Identity is immutable; name, default points and the active flag are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorType {
    pub id: String,
    pub name: String,
    pub category: BehaviorCategory,
    pub default_points: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BehaviorType {
    /// Generate a unique ID for a behavior type
    pub fn generate_id() -> String {
        format!("behavior::{}", Uuid::new_v4())
    }
}

/// A single logged occurrence of a behavior for a child.
///
/// `points_applied` may differ from the type's default; the child's star
/// total is always the sum of `points_applied` over their events, never a
/// stored number that could drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub id: String,
    pub child_id: String,
    pub behavior_type_id: String,
    pub occurred_at: DateTime<Utc>,
    pub points_applied: i64,
    pub note: Option<String>,
    /// Which parent logged the event, when the app tracks that.
    pub logged_by: Option<String>,
    pub media_refs: Vec<String>,
}

impl BehaviorEvent {
    /// Generate a unique ID for a behavior event
    pub fn generate_id() -> String {
        format!("event::{}", Uuid::new_v4())
    }
}
