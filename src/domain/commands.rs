//! Domain-level command and output types.
//! These structs are what callers (UI layer, tests) hand to the stores and
//! the use case; they carry raw user input before validation.

pub mod child {
    use chrono::NaiveDate;

    /// Input for creating a new child profile.
    #[derive(Debug, Clone)]
    pub struct CreateChildCommand {
        pub name: String,
        pub birthdate: Option<NaiveDate>,
        pub color_tag: String,
    }

    /// Input for updating a child profile. `None` fields are left unchanged.
    /// The birthdate is doubly optional: `Some(None)` clears a stored date.
    #[derive(Debug, Clone)]
    pub struct UpdateChildCommand {
        pub child_id: String,
        pub name: Option<String>,
        pub birthdate: Option<Option<NaiveDate>>,
        pub color_tag: Option<String>,
    }
}

pub mod behavior {
    use chrono::{DateTime, Utc};

    use crate::domain::models::behavior::BehaviorCategory;

    /// Input for adding a behavior type to the catalog.
    #[derive(Debug, Clone)]
    pub struct CreateBehaviorTypeCommand {
        pub name: String,
        pub category: BehaviorCategory,
        pub default_points: i64,
    }

    /// Input for updating a behavior type. Identity and category are fixed.
    #[derive(Debug, Clone)]
    pub struct UpdateBehaviorTypeCommand {
        pub behavior_type_id: String,
        pub name: Option<String>,
        pub default_points: Option<i64>,
        pub active: Option<bool>,
    }

    /// Input for recording a behavior event.
    #[derive(Debug, Clone)]
    pub struct CreateBehaviorEventCommand {
        pub child_id: String,
        pub behavior_type_id: String,
        pub points_applied: i64,
        /// Defaults to now when omitted.
        pub occurred_at: Option<DateTime<Utc>>,
        pub note: Option<String>,
        pub logged_by: Option<String>,
        pub media_refs: Vec<String>,
    }

    /// Input for editing an already-logged event (explicit user action).
    #[derive(Debug, Clone)]
    pub struct UpdateBehaviorEventCommand {
        pub event_id: String,
        pub points_applied: Option<i64>,
        pub note: Option<String>,
    }
}

pub mod reward {
    /// Input for creating a reward (goal).
    #[derive(Debug, Clone)]
    pub struct CreateRewardCommand {
        pub child_id: String,
        pub name: String,
        pub target_points: i64,
        pub priority: u32,
    }

    /// Input for updating a reward. `None` fields are left unchanged.
    #[derive(Debug, Clone)]
    pub struct UpdateRewardCommand {
        pub reward_id: String,
        pub name: Option<String>,
        pub target_points: Option<i64>,
        pub priority: Option<u32>,
    }
}

pub mod logging {
    use crate::domain::models::behavior::BehaviorEvent;
    use crate::domain::models::progression::{Badge, Milestone};

    /// Input for the behavior-logging workflow.
    #[derive(Debug, Clone)]
    pub struct LogBehaviorCommand {
        pub child_id: String,
        pub behavior_type_id: String,
        pub points_applied: i64,
        pub note: Option<String>,
        pub logged_by: Option<String>,
        pub media_refs: Vec<String>,
    }

    /// Consolidated result of one logging transaction. Immutable record;
    /// the use case performs no side effects beyond the store calls.
    #[derive(Debug, Clone)]
    pub struct LogBehaviorOutput {
        pub event: BehaviorEvent,
        pub new_star_total: i64,
        pub earned_badge: Option<Badge>,
        pub milestone: Option<Milestone>,
        pub goal_reached: bool,
    }
}
