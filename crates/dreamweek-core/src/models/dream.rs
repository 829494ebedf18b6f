use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::goal::Goal;
use super::template::Template;

/// A long-lived aspiration. Owns its goal definitions.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Dream {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    /// Percent complete, 0–100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub notes: Vec<DreamNote>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Dream {
    pub fn goal(&self, goal_id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    pub fn goal_mut(&mut self, goal_id: &str) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.id == goal_id)
    }

    pub fn record(&mut self, event: impl Into<String>, at: jiff::Timestamp) {
        self.history.push(HistoryEntry {
            event: event.into(),
            at,
        });
        self.updated_at = at;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    /// Dream progress at which the milestone counts as reached.
    #[serde(default)]
    pub progress_threshold: Option<u8>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DreamNote {
    pub id: String,
    pub text: String,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoryEntry {
    pub event: String,
    pub at: jiff::Timestamp,
}

/// Everything stored under a user's dreams key: dreams plus the legacy
/// standalone templates. Written as one object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DreamDocument {
    #[serde(default)]
    pub dreams: Vec<Dream>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub updated_at: Option<jiff::Timestamp>,
}

impl DreamDocument {
    pub fn dream(&self, dream_id: &str) -> Option<&Dream> {
        self.dreams.iter().find(|d| d.id == dream_id)
    }

    pub fn dream_mut(&mut self, dream_id: &str) -> Option<&mut Dream> {
        self.dreams.iter_mut().find(|d| d.id == dream_id)
    }

    /// The dream owning goal `goal_id`, with the goal's index.
    pub fn locate_goal(&self, goal_id: &str) -> Option<(usize, usize)> {
        self.dreams.iter().enumerate().find_map(|(d, dream)| {
            dream
                .goals
                .iter()
                .position(|g| g.id == goal_id)
                .map(|g| (d, g))
        })
    }

    /// Standalone template joined to a goal by `id` or `goal_id`.
    pub fn template_for_goal(&self, goal_id: &str) -> Option<usize> {
        self.templates
            .iter()
            .position(|t| t.id == goal_id || t.goal_id.as_deref() == Some(goal_id))
    }
}
