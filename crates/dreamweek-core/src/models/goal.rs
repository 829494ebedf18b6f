use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calendar::WeekId;

/// Countdown value stamped on a completed deadline goal. A definition
/// carrying it recomputes its countdown from source fields when reactivated.
pub const COMPLETED_SENTINEL: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GoalKind {
    Deadline,
    Consistency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Recurrence {
    Weekly,
    Monthly,
}

/// A goal definition living inside `Dream.goals`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    /// Completions per period for consistency goals.
    #[serde(default)]
    pub frequency: Option<u32>,
    #[serde(default)]
    pub target_weeks: Option<i32>,
    #[serde(default)]
    pub target_months: Option<u32>,
    #[serde(default)]
    pub target_date: Option<jiff::civil::Date>,
    /// Cached countdown. May be stale across weeks; `-1` once completed.
    #[serde(default)]
    pub weeks_remaining: Option<i32>,
    /// Week the countdown started from.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub start_week: Option<WeekId>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<jiff::Timestamp>,
    /// Set when the goal was already paused at completion; reopening keeps it paused.
    #[serde(default)]
    pub paused_at_completion: bool,
    pub created_at: jiff::Timestamp,
}

impl Goal {
    /// Completed or deactivated goals never receive new instances.
    pub fn is_retired(&self) -> bool {
        self.completed || !self.active
    }
}

pub(crate) fn default_active() -> bool {
    true
}
