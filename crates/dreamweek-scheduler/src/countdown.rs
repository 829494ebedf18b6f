//! The single countdown calculation shared by filtering, building,
//! post-filtering and parent sync.
//!
//! Precedence: a cached `weeks_remaining` (unless it is the completed
//! sentinel), then `target_weeks` / `target_months` counted from
//! `start_week`, then (deadlines only) the distance to `target_date`.
//! `None` means open-ended.

use dreamweek_core::WeekId;
use dreamweek_core::calendar::{months_to_weeks, weeks_between, weeks_until};
use dreamweek_core::models::goal::{COMPLETED_SENTINEL, GoalKind};
use dreamweek_core::models::instance::{InstanceKind, WeekInstance};

use crate::definition::Definition;

/// Weeks left for `def` as seen from `week`.
pub fn weeks_remaining(def: &Definition, week: WeekId) -> Option<i32> {
    weeks_remaining_at(def, week, week)
}

/// Weeks left for `def` in `week`, where a cached countdown refers to `current`.
pub fn weeks_remaining_at(def: &Definition, week: WeekId, current: WeekId) -> Option<i32> {
    match def.weeks_remaining {
        Some(cached) if cached != COMPLETED_SENTINEL => {
            Some(cached - weeks_between(current, week))
        }
        _ => recompute(def, week),
    }
}

/// Countdown from source fields only, ignoring any cached value.
pub fn recompute(def: &Definition, week: WeekId) -> Option<i32> {
    let elapsed = def.start_week.map(|start| weeks_between(start, week));

    match def.kind {
        GoalKind::Deadline => {
            if let Some(total) = def.target_weeks {
                return Some(total - elapsed.unwrap_or(0));
            }
            def.target_date.map(|date| weeks_until(date, week))
        }
        GoalKind::Consistency => {
            let total = def
                .target_weeks
                .or_else(|| def.target_months.map(|m| months_to_weeks(m) as i32))?;
            // Weeks left after the current one once a start is known.
            Some(match elapsed {
                Some(elapsed) => total - elapsed - 1,
                None => total,
            })
        }
    }
}

/// Whether `def` is past its end as seen from `week`.
///
/// A deadline whose target date lies in an earlier week is expired no matter
/// what the cached countdown says.
pub fn is_expired(def: &Definition, week: WeekId) -> bool {
    if def.kind == GoalKind::Deadline
        && def.target_date.is_some_and(|date| weeks_until(date, week) < 0)
    {
        return true;
    }
    weeks_remaining(def, week).is_some_and(|remaining| remaining < 0)
}

/// Recomputed countdown of a deadline instance in its own week.
pub fn instance_weeks_remaining(instance: &WeekInstance) -> Option<i32> {
    match instance.target_date {
        Some(date) => Some(weeks_until(date, instance.week_id)),
        None => instance.weeks_remaining,
    }
}

pub fn instance_expired(instance: &WeekInstance) -> bool {
    instance.kind == InstanceKind::Deadline
        && instance_weeks_remaining(instance).is_some_and(|remaining| remaining < 0)
}
