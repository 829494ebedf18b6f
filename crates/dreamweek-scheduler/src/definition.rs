//! One shape for both sources of recurrence.
//!
//! Goals can come from legacy standalone templates or from goals inline in a
//! dream. Both normalize into a [`Definition`] before filtering, and the two
//! lists are deduplicated by id so a goal yields at most one instance a week.

use std::collections::HashMap;

use tracing::debug;

use dreamweek_core::WeekId;
use dreamweek_core::models::dream::{Dream, DreamDocument};
use dreamweek_core::models::goal::{Goal, GoalKind, Recurrence};
use dreamweek_core::models::instance::WeekInstance;
use dreamweek_core::models::template::Template;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Template,
    DreamGoal,
    /// Added directly to a week, with no definition behind it.
    Freestanding,
}

/// A recurrence definition as found in the dream document.
#[derive(Debug, Clone, Copy)]
pub enum RecurrenceSource<'a> {
    Template(&'a Template),
    DreamGoal { dream: &'a Dream, goal: &'a Goal },
}

/// The normalized definition every scheduler stage works on.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub id: String,
    pub title: String,
    pub origin: Origin,
    pub dream_id: Option<String>,
    pub dream_title: Option<String>,
    pub kind: GoalKind,
    pub recurrence: Option<Recurrence>,
    pub frequency: Option<u32>,
    pub target_weeks: Option<i32>,
    pub target_months: Option<u32>,
    pub target_date: Option<jiff::civil::Date>,
    pub weeks_remaining: Option<i32>,
    pub start_week: Option<WeekId>,
    pub active: bool,
    pub completed: bool,
    pub completed_at: Option<jiff::Timestamp>,
    /// Ids of legacy templates folded into this definition. Instances
    /// created from those templates carry one of them as `template_id`.
    pub aliases: Vec<String>,
}

impl RecurrenceSource<'_> {
    pub fn normalize(&self) -> Definition {
        match *self {
            RecurrenceSource::Template(t) => Definition {
                id: t.id.clone(),
                title: t.title.clone(),
                origin: Origin::Template,
                dream_id: t.dream_id.clone(),
                dream_title: t.dream_title.clone(),
                kind: t.goal_type,
                recurrence: t.recurrence,
                frequency: t.frequency,
                target_weeks: t.target_weeks,
                target_months: t.target_months,
                target_date: t.target_date,
                weeks_remaining: t.weeks_remaining,
                start_week: t.start_week,
                active: t.active,
                completed: t.completed,
                completed_at: t.completed_at,
                aliases: Vec::new(),
            },
            RecurrenceSource::DreamGoal { dream, goal } => Definition {
                id: goal.id.clone(),
                title: goal.title.clone(),
                origin: Origin::DreamGoal,
                dream_id: Some(dream.id.clone()),
                dream_title: Some(dream.title.clone()),
                kind: goal.kind,
                recurrence: goal.recurrence,
                frequency: goal.frequency,
                target_weeks: goal.target_weeks,
                target_months: goal.target_months,
                target_date: goal.target_date,
                weeks_remaining: goal.weeks_remaining,
                start_week: goal.start_week,
                active: goal.active,
                completed: goal.completed,
                completed_at: goal.completed_at,
                aliases: Vec::new(),
            },
        }
    }
}

impl Definition {
    /// A one-off goal added straight to a week.
    pub fn freestanding(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            origin: Origin::Freestanding,
            dream_id: None,
            dream_title: None,
            kind: GoalKind::Consistency,
            recurrence: None,
            frequency: None,
            target_weeks: None,
            target_months: None,
            target_date: None,
            weeks_remaining: None,
            start_week: None,
            active: true,
            completed: false,
            completed_at: None,
            aliases: Vec::new(),
        }
    }

    /// Every id an instance of this definition may carry as `template_id`.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Whether `existing` already holds an instance of this definition for `week_id`.
    pub fn is_materialized(&self, existing: &[WeekInstance], week_id: WeekId) -> bool {
        existing
            .iter()
            .any(|instance| self.ids().any(|id| instance.materializes(id, week_id)))
    }

    pub fn is_retired(&self) -> bool {
        self.completed || !self.active
    }
}

/// Candidate definitions from both sources, with duplicates folded away.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    pub templates: Vec<Definition>,
    pub dream_goals: Vec<Definition>,
}

impl Candidates {
    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.dream_goals.iter().chain(self.templates.iter())
    }

    pub fn len(&self) -> usize {
        self.templates.len() + self.dream_goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize every template and inline goal of `doc` into two disjoint lists.
///
/// A template sharing its id (or `goal_id`) with an inline goal is dropped in
/// favour of the goal. Its retirement still counts: if either copy is
/// completed or inactive, the surviving definition is too.
pub fn collect_candidates(doc: &DreamDocument) -> Candidates {
    let mut dream_goals: Vec<Definition> = doc
        .dreams
        .iter()
        .flat_map(|dream| {
            dream
                .goals
                .iter()
                .map(move |goal| RecurrenceSource::DreamGoal { dream, goal }.normalize())
        })
        .collect();

    let by_id: HashMap<String, usize> = dream_goals
        .iter()
        .enumerate()
        .map(|(i, d)| (d.id.clone(), i))
        .collect();

    let mut templates = Vec::new();
    for template in &doc.templates {
        let twin = by_id
            .get(&template.id)
            .or_else(|| template.goal_id.as_ref().and_then(|id| by_id.get(id)))
            .copied();

        match twin {
            Some(i) => {
                let goal = &mut dream_goals[i];
                goal.completed |= template.completed;
                goal.active &= template.active;
                if template.id != goal.id {
                    goal.aliases.push(template.id.clone());
                }
                debug!(template_id = %template.id, goal_id = %goal.id, "template folded into dream goal");
            }
            None => {
                let mut def = RecurrenceSource::Template(template).normalize();
                if def.dream_title.is_none() {
                    def.dream_title = def
                        .dream_id
                        .as_deref()
                        .and_then(|id| doc.dream(id))
                        .map(|dream| dream.title.clone());
                }
                templates.push(def);
            }
        }
    }

    Candidates {
        templates,
        dream_goals,
    }
}
