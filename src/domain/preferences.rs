//! Family-wide preferences, collapsed into one explicit structure with
//! named fields and documented defaults. Injected into the stores that
//! need it instead of being read as ambient global state.

use crate::domain::models::behavior::BehaviorCategory;

/// One badge rule: "the child has logged at least `required_count` events
/// of `category`". Each rule can award its badge once per child.
#[derive(Debug, Clone)]
pub struct BadgeRule {
    pub id: String,
    pub name: String,
    pub category: BehaviorCategory,
    pub required_count: usize,
}

impl BadgeRule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: BehaviorCategory,
        required_count: usize,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            required_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FamilyPreferences {
    /// Percent crossings of a reward target reported as milestones,
    /// each at most once per (child, reward). Default: 50% and 100%.
    pub milestone_thresholds: Vec<u8>,
    /// Badge ladder evaluated against each child's full event history.
    pub badge_rules: Vec<BadgeRule>,
    /// How many of the most recent events feed the suggestion ranking.
    /// Default: 10.
    pub suggestion_recent_window: usize,
    /// Maximum number of suggested behavior types returned. Default: 5.
    pub suggestion_limit: usize,
}

impl Default for FamilyPreferences {
    fn default() -> Self {
        Self {
            milestone_thresholds: vec![50, 100],
            badge_rules: vec![
                BadgeRule::new("first-star", "First Star", BehaviorCategory::Positive, 1),
                BadgeRule::new("helping-hand", "Helping Hand", BehaviorCategory::Positive, 10),
                BadgeRule::new(
                    "routine-builder",
                    "Routine Builder",
                    BehaviorCategory::RoutinePositive,
                    5,
                ),
            ],
            suggestion_recent_window: 10,
            suggestion_limit: 5,
        }
    }
}
