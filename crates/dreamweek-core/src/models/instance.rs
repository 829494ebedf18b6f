use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::goal::Recurrence;
use crate::calendar::WeekId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InstanceKind {
    WeeklyGoal,
    Deadline,
}

/// A week-scoped, completable materialization of a goal definition.
///
/// Never physically deleted; skipping marks it inert for its week only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeekInstance {
    pub id: String,
    /// Definition that spawned this instance, or the instance itself for
    /// freestanding goals.
    pub template_id: String,
    #[serde(rename = "type")]
    pub kind: InstanceKind,
    pub title: String,
    #[serde(default)]
    pub dream_id: Option<String>,
    #[serde(default)]
    pub dream_title: Option<String>,
    #[ts(type = "string")]
    pub week_id: WeekId,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub frequency: Option<u32>,
    #[serde(default)]
    pub target_weeks: Option<i32>,
    #[serde(default)]
    pub weeks_remaining: Option<i32>,
    #[serde(default)]
    pub target_date: Option<jiff::civil::Date>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<jiff::Timestamp>,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub skipped_at: Option<jiff::Timestamp>,
    #[serde(default)]
    pub completion_count: u32,
    #[serde(default)]
    pub completion_dates: Vec<jiff::Timestamp>,
    pub created_at: jiff::Timestamp,
}

impl WeekInstance {
    /// Conventional instance id: `{template_id}_{week_id}`.
    pub fn compose_id(template_id: &str, week_id: WeekId) -> String {
        format!("{template_id}_{week_id}")
    }

    /// Whether this instance materializes definition `definition_id` in `week_id`.
    pub fn materializes(&self, definition_id: &str, week_id: WeekId) -> bool {
        self.week_id == week_id
            && (self.id == definition_id
                || self.template_id == definition_id
                || self.id == Self::compose_id(definition_id, week_id))
    }

    /// Counter-tracked instances complete after `frequency` check-ins. A zero
    /// frequency cannot be counted and falls back to a plain toggle.
    pub fn is_frequency_tracked(&self) -> bool {
        self.recurrence.is_some() && self.frequency.is_some_and(|f| f > 0)
    }
}
