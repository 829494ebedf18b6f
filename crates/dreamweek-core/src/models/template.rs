use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::goal::{GoalKind, Recurrence, default_active};
use crate::calendar::WeekId;

/// Document type tag carried by every legacy template.
pub const TEMPLATE_DOC_TYPE: &str = "weekly_goal_template";

/// A legacy standalone recurrence definition stored next to the dreams.
///
/// Mirrors the recurrence fields of [`super::goal::Goal`] plus a
/// back-reference to its dream. Older records may lack `dream_id`; the
/// repair routine back-fills it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Template {
    pub id: String,
    #[serde(rename = "type", default = "template_doc_type")]
    pub doc_type: String,
    pub title: String,
    #[serde(default)]
    pub dream_id: Option<String>,
    #[serde(default)]
    pub dream_title: Option<String>,
    /// Inline goal this template was created for, when it differs from `id`.
    #[serde(default)]
    pub goal_id: Option<String>,
    #[serde(default = "consistency")]
    pub goal_type: GoalKind,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub frequency: Option<u32>,
    #[serde(default)]
    pub target_weeks: Option<i32>,
    #[serde(default)]
    pub target_months: Option<u32>,
    #[serde(default)]
    pub target_date: Option<jiff::civil::Date>,
    #[serde(default)]
    pub weeks_remaining: Option<i32>,
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

fn template_doc_type() -> String {
    TEMPLATE_DOC_TYPE.to_string()
}

fn consistency() -> GoalKind {
    GoalKind::Consistency
}
