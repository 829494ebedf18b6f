//! Goal definition CRUD on dreams, plus freestanding goals added straight to
//! a week.
//!
//! Definition writes go through [`refetch::mutate_dreams`]. New instances are
//! built with the same [`build_instance`] the instantiation pass uses.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use dreamweek_core::WeekId;
use dreamweek_core::models::goal::{COMPLETED_SENTINEL, Goal, GoalKind, Recurrence};
use dreamweek_core::models::instance::WeekInstance;

use crate::Scheduler;
use crate::builder::build_instance;
use crate::countdown;
use crate::definition::{Definition, RecurrenceSource};
use crate::error::SchedulerError;
use crate::events::Topic;
use crate::refetch;

/// Fields accepted when adding a goal to a dream.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGoal {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: GoalKind,
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
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalAdded {
    pub goal: Goal,
    /// Instance created for the week, unless the goal was already expired
    /// or already had one.
    pub instance: Option<WeekInstance>,
}

impl Scheduler {
    /// Attach a new goal to `dream_id` and instantiate it for `week_id`.
    pub async fn add_dream_goal(
        &self,
        user_id: &str,
        week_id: WeekId,
        dream_id: &str,
        new: NewGoal,
        now: jiff::Timestamp,
    ) -> Result<GoalAdded, SchedulerError> {
        if new.title.trim().is_empty() {
            return Err(SchedulerError::InvalidGoal("title must not be empty".to_string()));
        }
        if new.frequency == Some(0) {
            return Err(SchedulerError::InvalidGoal("frequency must be at least 1".to_string()));
        }

        let (goal, def) = refetch::mutate_dreams(self.store(), user_id, |doc| {
            let dream = doc
                .dream_mut(dream_id)
                .ok_or_else(|| SchedulerError::DreamNotFound {
                    dream_id: dream_id.to_string(),
                })?;

            let goal = Goal {
                id: Uuid::new_v4().to_string(),
                title: new.title,
                kind: new.kind,
                recurrence: new.recurrence,
                frequency: new.frequency,
                target_weeks: new.target_weeks,
                target_months: new.target_months,
                target_date: new.target_date,
                weeks_remaining: None,
                start_week: Some(week_id),
                active: true,
                completed: false,
                completed_at: None,
                paused_at_completion: false,
                created_at: now,
            };
            let def = RecurrenceSource::DreamGoal {
                dream: &*dream,
                goal: &goal,
            }
            .normalize();

            dream.record(format!("goal \"{}\" added", goal.title), now);
            dream.goals.push(goal.clone());
            Ok((goal, def))
        })
        .await?;

        info!(user_id, dream_id, goal_id = %goal.id, "goal added to dream");
        self.bus().publish(Topic::DreamsUpdated);

        let instance = if countdown::is_expired(&def, week_id) {
            None
        } else {
            self.append_instance(user_id, week_id, &def, now).await?
        };

        Ok(GoalAdded { goal, instance })
    }

    /// Add a one-off goal to `week_id` with no definition behind it.
    ///
    /// With a `frequency` the goal is counted like a weekly goal, otherwise
    /// it is a plain toggle.
    pub async fn add_freestanding_goal(
        &self,
        user_id: &str,
        week_id: WeekId,
        title: &str,
        frequency: Option<u32>,
        now: jiff::Timestamp,
    ) -> Result<WeekInstance, SchedulerError> {
        if title.trim().is_empty() {
            return Err(SchedulerError::InvalidGoal("title must not be empty".to_string()));
        }
        if frequency == Some(0) {
            return Err(SchedulerError::InvalidGoal("frequency must be at least 1".to_string()));
        }

        let mut def = Definition::freestanding(Uuid::new_v4().to_string(), title);
        if frequency.is_some() {
            def.recurrence = Some(Recurrence::Weekly);
            def.frequency = frequency;
        }

        self.append_instance(user_id, week_id, &def, now)
            .await?
            .ok_or_else(|| SchedulerError::InstanceNotFound {
                instance_id: def.id.clone(),
            })
    }

    /// Stop a goal from receiving new instances. Existing instances stay.
    pub async fn deactivate_goal(
        &self,
        user_id: &str,
        dream_id: &str,
        goal_id: &str,
        now: jiff::Timestamp,
    ) -> Result<Goal, SchedulerError> {
        let goal = refetch::mutate_dreams(self.store(), user_id, |doc| {
            if let Some(t) = doc.template_for_goal(goal_id) {
                let template = &mut doc.templates[t];
                template.active = false;
                template.paused_at_completion = template.completed;
            }
            let dream = doc
                .dream_mut(dream_id)
                .ok_or_else(|| SchedulerError::DreamNotFound {
                    dream_id: dream_id.to_string(),
                })?;
            let goal = dream.goal_mut(goal_id).ok_or_else(|| SchedulerError::GoalNotFound {
                goal_id: goal_id.to_string(),
            })?;
            goal.active = false;
            // A completed goal stays paused if it is reopened later.
            goal.paused_at_completion = goal.completed;
            let goal = goal.clone();
            dream.record(format!("goal \"{}\" paused", goal.title), now);
            Ok(goal)
        })
        .await?;

        info!(user_id, dream_id, goal_id, "goal deactivated");
        self.bus().publish(Topic::DreamsUpdated);
        Ok(goal)
    }

    /// Bring a completed or deactivated goal back. A completed countdown is
    /// recomputed from its source fields as of `week_id`.
    pub async fn reactivate_goal(
        &self,
        user_id: &str,
        week_id: WeekId,
        dream_id: &str,
        goal_id: &str,
        now: jiff::Timestamp,
    ) -> Result<Goal, SchedulerError> {
        let goal = refetch::mutate_dreams(self.store(), user_id, |doc| {
            if let Some(t) = doc.template_for_goal(goal_id) {
                let recomputed =
                    countdown::recompute(&RecurrenceSource::Template(&doc.templates[t]).normalize(), week_id);
                let template = &mut doc.templates[t];
                template.active = true;
                template.completed = false;
                template.completed_at = None;
                template.paused_at_completion = false;
                if template.weeks_remaining == Some(COMPLETED_SENTINEL) {
                    template.weeks_remaining = recomputed;
                }
            }

            let dream = doc
                .dream_mut(dream_id)
                .ok_or_else(|| SchedulerError::DreamNotFound {
                    dream_id: dream_id.to_string(),
                })?;
            let recomputed = {
                let goal = dream.goal(goal_id).ok_or_else(|| SchedulerError::GoalNotFound {
                    goal_id: goal_id.to_string(),
                })?;
                let def = RecurrenceSource::DreamGoal {
                    dream: &*dream,
                    goal,
                }
                .normalize();
                countdown::recompute(&def, week_id)
            };
            let goal = dream.goal_mut(goal_id).ok_or_else(|| SchedulerError::GoalNotFound {
                goal_id: goal_id.to_string(),
            })?;
            goal.active = true;
            goal.completed = false;
            goal.completed_at = None;
            goal.paused_at_completion = false;
            if goal.weeks_remaining == Some(COMPLETED_SENTINEL) {
                goal.weeks_remaining = recomputed;
            }
            let goal = goal.clone();
            dream.record(format!("goal \"{}\" reactivated", goal.title), now);
            Ok(goal)
        })
        .await?;

        info!(user_id, dream_id, goal_id, "goal reactivated");
        self.bus().publish(Topic::DreamsUpdated);
        self.bus().publish(Topic::GoalsUpdated);
        Ok(goal)
    }

    /// Build an instance of `def` for `week_id` and append it to the freshly
    /// fetched week. `None` when the week already holds one.
    async fn append_instance(
        &self,
        user_id: &str,
        week_id: WeekId,
        def: &Definition,
        now: jiff::Timestamp,
    ) -> Result<Option<WeekInstance>, SchedulerError> {
        let instance = build_instance(def, week_id, week_id, self.config(), now);
        let (_doc, appended) = refetch::mutate_week(self.store(), user_id, week_id, |goals| {
            if def.is_materialized(goals, week_id) {
                return Ok(None);
            }
            goals.push(instance.clone());
            Ok(Some(instance))
        })
        .await?;

        if let Some(instance) = &appended {
            info!(user_id, week_id = %week_id, instance_id = %instance.id, "instance added");
            self.bus().publish(Topic::GoalsUpdated);
        }
        Ok(appended)
    }
}
