//! Mirrors a deadline instance's completion onto its goal definition and
//! standalone template.
//!
//! Both records live in the dream document and are written together in one
//! save. Writing them separately leaves a window where the template still
//! looks open, and the next instantiation would bring a finished deadline
//! back.

use serde::Serialize;
use tracing::{info, warn};

use dreamweek_core::models::dream::DreamDocument;
use dreamweek_core::models::goal::COMPLETED_SENTINEL;
use dreamweek_core::models::instance::WeekInstance;

use crate::Scheduler;
use crate::countdown;
use crate::definition::RecurrenceSource;
use crate::error::SchedulerError;
use crate::events::Topic;
use crate::refetch;

/// Records touched by a parent sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncedParent {
    pub goal_id: String,
    pub dream_id: Option<String>,
    pub template_id: Option<String>,
}

/// The completion fields shared by goals and templates.
struct CompletionFields<'a> {
    completed: &'a mut bool,
    active: &'a mut bool,
    completed_at: &'a mut Option<jiff::Timestamp>,
    weeks_remaining: &'a mut Option<i32>,
    paused_at_completion: &'a mut bool,
}

impl CompletionFields<'_> {
    fn mirror(self, completed: bool, now: jiff::Timestamp, recomputed: Option<i32>) {
        if completed {
            if !*self.completed {
                *self.paused_at_completion = !*self.active;
            }
            *self.active = false;
            *self.completed_at = Some(now);
            *self.weeks_remaining = Some(COMPLETED_SENTINEL);
        } else {
            if *self.completed {
                *self.active = !*self.paused_at_completion;
            }
            *self.paused_at_completion = false;
            *self.completed_at = None;
            if *self.weeks_remaining == Some(COMPLETED_SENTINEL) {
                *self.weeks_remaining = recomputed;
            }
        }
        *self.completed = completed;
    }
}

/// Update the goal and template behind `instance` in `doc`.
///
/// Returns `None` when neither can be found; the caller treats that as a
/// tolerated inconsistency.
pub fn apply_parent_sync(
    doc: &mut DreamDocument,
    instance: &WeekInstance,
    now: jiff::Timestamp,
) -> Option<SyncedParent> {
    // Instances of a legacy template carry the template's id; its goal_id
    // leads to the inline goal it was folded into.
    let via_template = doc
        .templates
        .iter()
        .find(|t| t.id == instance.template_id)
        .and_then(|t| t.goal_id.clone());
    let located = [Some(instance.template_id.as_str()), Some(instance.id.as_str()), via_template.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|id| doc.locate_goal(id).map(|at| (id.to_string(), at)));

    let goal_id = located
        .as_ref()
        .map(|(id, _)| id.clone())
        .unwrap_or_else(|| instance.template_id.clone());
    let template_at = doc.template_for_goal(&goal_id);

    if located.is_none() && template_at.is_none() {
        return None;
    }

    let completed = instance.completed;
    let mut synced = SyncedParent {
        goal_id: goal_id.clone(),
        dream_id: None,
        template_id: None,
    };

    if let Some((_, (d, g))) = located {
        let dream = &mut doc.dreams[d];
        let recomputed = {
            let def = RecurrenceSource::DreamGoal {
                dream: &*dream,
                goal: &dream.goals[g],
            }
            .normalize();
            countdown::recompute(&def, instance.week_id)
        };
        let goal = &mut dream.goals[g];
        CompletionFields {
            completed: &mut goal.completed,
            active: &mut goal.active,
            completed_at: &mut goal.completed_at,
            weeks_remaining: &mut goal.weeks_remaining,
            paused_at_completion: &mut goal.paused_at_completion,
        }
        .mirror(completed, now, recomputed);

        let verb = if completed { "completed" } else { "reopened" };
        let event = format!("goal \"{}\" {verb}", goal.title);
        dream.record(event, now);
        synced.dream_id = Some(dream.id.clone());
    }

    if let Some(t) = template_at {
        let recomputed = {
            let def = RecurrenceSource::Template(&doc.templates[t]).normalize();
            countdown::recompute(&def, instance.week_id)
        };
        let template = &mut doc.templates[t];
        CompletionFields {
            completed: &mut template.completed,
            active: &mut template.active,
            completed_at: &mut template.completed_at,
            weeks_remaining: &mut template.weeks_remaining,
            paused_at_completion: &mut template.paused_at_completion,
        }
        .mirror(completed, now, recomputed);
        synced.template_id = Some(template.id.clone());
    }

    Some(synced)
}

impl Scheduler {
    /// Mirror `instance`'s completion onto its parent definitions.
    ///
    /// `Ok(None)` when the parent cannot be found: logged and tolerated, the
    /// instance itself stays the source of truth. Storage failures are
    /// returned so the caller can compensate.
    pub async fn sync_parent(
        &self,
        user_id: &str,
        instance: &WeekInstance,
        now: jiff::Timestamp,
    ) -> Result<Option<SyncedParent>, SchedulerError> {
        let result = refetch::mutate_dreams(self.store(), user_id, |doc| {
            apply_parent_sync(doc, instance, now).ok_or_else(|| SchedulerError::GoalNotFound {
                goal_id: instance.template_id.clone(),
            })
        })
        .await;

        match result {
            Ok(synced) => {
                info!(
                    user_id,
                    goal_id = %synced.goal_id,
                    template_id = ?synced.template_id,
                    completed = instance.completed,
                    "parent goal synced"
                );
                self.bus().publish(Topic::DreamsUpdated);
                Ok(Some(synced))
            }
            Err(SchedulerError::GoalNotFound { goal_id }) => {
                warn!(
                    user_id,
                    instance_id = %instance.id,
                    goal_id = %goal_id,
                    "deadline instance has no parent goal, skipping sync"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
