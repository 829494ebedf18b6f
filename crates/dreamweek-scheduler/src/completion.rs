//! Completion: boolean toggles, frequency counters and skips.
//!
//! Every operation follows the same protocol: compute the new list, show it
//! immediately, re-fetch the week and apply the change to that copy, save,
//! and on failure restore the snapshot and tell the user. This is the only
//! place user-visible error notices come from.

use serde::Serialize;
use tracing::{error, info};

use dreamweek_core::WeekId;
use dreamweek_core::models::instance::{InstanceKind, WeekInstance};

use crate::Scheduler;
use crate::error::SchedulerError;
use crate::local::BoardHandle;
use crate::notify::Notice;
use crate::optimistic::OptimisticUpdate;
use crate::parent_sync::SyncedParent;
use crate::refetch;

/// How an instance counts as done, picked from its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Flip `completed`.
    Toggle,
    /// Count check-ins up to `frequency`.
    Counter,
}

pub fn policy(instance: &WeekInstance) -> Policy {
    if instance.is_frequency_tracked() {
        Policy::Counter
    } else {
        Policy::Toggle
    }
}

/// Flip a plain instance. Counter instances are rejected.
pub fn toggle(instance: &mut WeekInstance, now: jiff::Timestamp) -> Result<bool, SchedulerError> {
    if policy(instance) != Policy::Toggle {
        return Err(SchedulerError::PolicyMismatch {
            instance_id: instance.id.clone(),
            expected: "a toggle goal",
        });
    }
    instance.completed = !instance.completed;
    instance.completed_at = instance.completed.then_some(now);
    Ok(true)
}

/// Record one check-in. Clamped at `frequency`; returns whether anything changed.
pub fn increment(instance: &mut WeekInstance, now: jiff::Timestamp) -> Result<bool, SchedulerError> {
    let frequency = counter_target(instance)?;
    let next = (instance.completion_count + 1).min(frequency);
    if next == instance.completion_count {
        return Ok(false);
    }
    instance.completion_count = next;
    instance.completion_dates.push(now);
    settle(instance, frequency, now);
    Ok(true)
}

/// Undo the latest check-in. Never goes below zero.
pub fn decrement(instance: &mut WeekInstance, now: jiff::Timestamp) -> Result<bool, SchedulerError> {
    let frequency = counter_target(instance)?;
    if instance.completion_count == 0 {
        return Ok(false);
    }
    instance.completion_count = (instance.completion_count - 1).min(frequency);
    instance.completion_dates.pop();
    settle(instance, frequency, now);
    Ok(true)
}

/// Mark an instance as sat out for its week.
pub fn skip(instance: &mut WeekInstance, now: jiff::Timestamp) -> bool {
    if instance.skipped {
        return false;
    }
    instance.skipped = true;
    instance.skipped_at = Some(now);
    true
}

fn counter_target(instance: &WeekInstance) -> Result<u32, SchedulerError> {
    match (policy(instance), instance.frequency) {
        (Policy::Counter, Some(frequency)) => Ok(frequency),
        _ => Err(SchedulerError::PolicyMismatch {
            instance_id: instance.id.clone(),
            expected: "a frequency goal",
        }),
    }
}

fn settle(instance: &mut WeekInstance, frequency: u32, now: jiff::Timestamp) {
    let done = instance.completion_count >= frequency;
    if !done {
        instance.completed_at = None;
    } else if !instance.completed {
        instance.completed_at = Some(now);
    }
    instance.completed = done;
}

/// The week an interaction applies to, and the list rendered for it.
#[derive(Debug, Clone, Copy)]
pub struct WeekTarget<'a> {
    pub user_id: &'a str,
    pub week_id: WeekId,
    pub board: &'a BoardHandle,
}

/// An instance before and after a persisted mutation.
#[derive(Debug, Clone)]
pub struct Applied {
    pub prior: WeekInstance,
    pub updated: WeekInstance,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub instance: WeekInstance,
    pub changed: bool,
    /// Set when a deadline toggle updated the parent goal.
    pub parent: Option<SyncedParent>,
}

#[derive(Debug, Clone)]
pub enum SkipOutcome {
    /// The user did not confirm; nothing changed.
    Declined,
    Skipped(WeekInstance),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocalEffect {
    Edit,
    Remove,
}

impl Scheduler {
    /// Flip a plain instance. Deadline instances also sync their parent goal.
    pub async fn toggle_completion(
        &self,
        target: WeekTarget<'_>,
        instance_id: &str,
        now: jiff::Timestamp,
    ) -> Result<CompletionOutcome, SchedulerError> {
        let applied = self
            .apply_to_instance(&target, instance_id, LocalEffect::Edit, "update this goal", |i| {
                toggle(i, now)
            })
            .await?;

        let mut parent = None;
        if applied.changed && applied.updated.kind == InstanceKind::Deadline {
            match self.sync_parent(target.user_id, &applied.updated, now).await {
                Ok(synced) => parent = synced,
                Err(e) => {
                    self.revert_instance(&target, &applied.prior).await;
                    self.report_failure(&target, instance_id, "update this goal", &e);
                    return Err(e);
                }
            }
        }

        Ok(CompletionOutcome {
            instance: applied.updated,
            changed: applied.changed,
            parent,
        })
    }

    /// Record a check-in on a frequency instance.
    pub async fn increment(
        &self,
        target: WeekTarget<'_>,
        instance_id: &str,
        now: jiff::Timestamp,
    ) -> Result<CompletionOutcome, SchedulerError> {
        let applied = self
            .apply_to_instance(&target, instance_id, LocalEffect::Edit, "record this check-in", |i| {
                increment(i, now)
            })
            .await?;
        Ok(CompletionOutcome {
            instance: applied.updated,
            changed: applied.changed,
            parent: None,
        })
    }

    /// Undo the latest check-in on a frequency instance.
    pub async fn decrement(
        &self,
        target: WeekTarget<'_>,
        instance_id: &str,
        now: jiff::Timestamp,
    ) -> Result<CompletionOutcome, SchedulerError> {
        let applied = self
            .apply_to_instance(&target, instance_id, LocalEffect::Edit, "undo this check-in", |i| {
                decrement(i, now)
            })
            .await?;
        Ok(CompletionOutcome {
            instance: applied.updated,
            changed: applied.changed,
            parent: None,
        })
    }

    /// Skip an instance for its week once `confirm` agrees.
    ///
    /// The instance disappears from the rendered list and is marked skipped
    /// in the store. The definition is untouched, so next week brings it back.
    pub async fn skip(
        &self,
        target: WeekTarget<'_>,
        instance_id: &str,
        confirm: impl FnOnce(&WeekInstance) -> bool,
        now: jiff::Timestamp,
    ) -> Result<SkipOutcome, SchedulerError> {
        let shown = target
            .board
            .snapshot()
            .await
            .and_then(|list| list.into_iter().find(|i| i.id == instance_id));
        let instance = match shown {
            Some(instance) => instance,
            None => self
                .store()
                .get_week(target.user_id, target.week_id)
                .await?
                .and_then(|doc| doc.goals.into_iter().find(|i| i.id == instance_id))
                .ok_or_else(|| SchedulerError::InstanceNotFound {
                    instance_id: instance_id.to_string(),
                })?,
        };

        if !confirm(&instance) {
            return Ok(SkipOutcome::Declined);
        }

        let applied = self
            .apply_to_instance(&target, instance_id, LocalEffect::Remove, "skip this goal", |i| {
                Ok(skip(i, now))
            })
            .await?;
        Ok(SkipOutcome::Skipped(applied.updated))
    }

    async fn apply_to_instance<F>(
        &self,
        target: &WeekTarget<'_>,
        instance_id: &str,
        effect: LocalEffect,
        action: &'static str,
        mutate: F,
    ) -> Result<Applied, SchedulerError>
    where
        F: Fn(&mut WeekInstance) -> Result<bool, SchedulerError> + Send + Sync,
    {
        let before = target.board.snapshot().await.unwrap_or_default();
        let mut after = before.clone();

        // The rendered copy only shapes what is shown right away. Whether
        // anything changes is decided on the freshly fetched week below.
        if let Some(pos) = after.iter().position(|i| i.id == instance_id) {
            let mut local = after[pos].clone();
            if mutate(&mut local)? {
                match effect {
                    LocalEffect::Edit => after[pos] = local,
                    LocalEffect::Remove => {
                        after.remove(pos);
                    }
                }
            }
        }

        let update = OptimisticUpdate::new(before, after);
        let persisted = update
            .run(target.board, async {
                let (_doc, applied) =
                    refetch::mutate_week(self.store(), target.user_id, target.week_id, |goals| {
                        let instance = goals
                            .iter_mut()
                            .find(|i| i.id == instance_id)
                            .ok_or_else(|| SchedulerError::InstanceNotFound {
                                instance_id: instance_id.to_string(),
                            })?;
                        let prior = instance.clone();
                        let changed = mutate(instance)?;
                        Ok(Applied {
                            prior,
                            updated: instance.clone(),
                            changed,
                        })
                    })
                    .await?;
                Ok::<_, SchedulerError>(applied)
            })
            .await;

        match persisted {
            Ok(applied) => {
                if effect == LocalEffect::Edit {
                    let confirmed = applied.updated.clone();
                    target
                        .board
                        .update(|list| {
                            if let Some(slot) = list.iter_mut().find(|i| i.id == confirmed.id) {
                                *slot = confirmed;
                            }
                        })
                        .await;
                }
                info!(
                    user_id = target.user_id,
                    week_id = %target.week_id,
                    instance_id,
                    completed = applied.updated.completed,
                    count = applied.updated.completion_count,
                    skipped = applied.updated.skipped,
                    "instance updated"
                );
                Ok(applied)
            }
            Err(e) => {
                self.report_failure(target, instance_id, action, &e);
                Err(e)
            }
        }
    }

    /// Put an instance's completion back after its parent could not be synced.
    async fn revert_instance(&self, target: &WeekTarget<'_>, prior: &WeekInstance) {
        let result = refetch::mutate_week(self.store(), target.user_id, target.week_id, |goals| {
            if let Some(instance) = goals.iter_mut().find(|i| i.id == prior.id) {
                instance.completed = prior.completed;
                instance.completed_at = prior.completed_at;
            }
            Ok(())
        })
        .await;

        if let Err(e) = result {
            error!(
                user_id = target.user_id,
                instance_id = %prior.id,
                error = %e,
                "could not revert instance after failed parent sync"
            );
        }

        let restored = prior.clone();
        target
            .board
            .update(|list| {
                if let Some(slot) = list.iter_mut().find(|i| i.id == restored.id) {
                    *slot = restored;
                }
            })
            .await;
    }

    fn report_failure(
        &self,
        target: &WeekTarget<'_>,
        instance_id: &str,
        action: &str,
        e: &SchedulerError,
    ) {
        error!(
            user_id = target.user_id,
            week_id = %target.week_id,
            instance_id,
            error = %e,
            "instance update rolled back"
        );
        let message = if e.is_transport() {
            format!("Could not {action}. Please check your connection and try again.")
        } else {
            format!("Could not {action}. Please refresh and try again.")
        };
        self.notifier().notify(Notice::error(message));
    }
}
