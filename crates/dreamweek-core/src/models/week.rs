use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::instance::WeekInstance;
use crate::calendar::WeekId;

/// All instances of one user for one ISO week. The unit of persistence for
/// instance mutations: every write replaces `goals` in full.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeekDocument {
    #[ts(type = "string")]
    pub week_id: WeekId,
    #[serde(default)]
    pub goals: Vec<WeekInstance>,
    #[serde(default)]
    pub stats: Option<WeekStats>,
    #[serde(default)]
    pub updated_at: Option<jiff::Timestamp>,
}

impl WeekDocument {
    pub fn empty(week_id: WeekId) -> Self {
        Self {
            week_id,
            goals: Vec::new(),
            stats: None,
            updated_at: None,
        }
    }

    /// A document ready to be written: stats recomputed, timestamp stamped.
    pub fn stamped(week_id: WeekId, goals: Vec<WeekInstance>, now: jiff::Timestamp) -> Self {
        Self {
            week_id,
            stats: Some(WeekStats::from_goals(&goals)),
            goals,
            updated_at: Some(now),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeekStats {
    pub total: u32,
    pub completed: u32,
    pub skipped: u32,
}

impl WeekStats {
    pub fn from_goals(goals: &[WeekInstance]) -> Self {
        goals.iter().fold(Self::default(), |mut stats, goal| {
            stats.total += 1;
            if goal.skipped {
                stats.skipped += 1;
            } else if goal.completed {
                stats.completed += 1;
            }
            stats
        })
    }

    /// A week counts towards the streak once anything in it was completed.
    pub fn is_successful(&self) -> bool {
        self.completed > 0
    }
}
