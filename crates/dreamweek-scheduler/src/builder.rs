//! Pure construction of week instances. Instantiation and manual goal
//! creation both go through [`build_instance`] so the two cannot drift apart.

use dreamweek_core::WeekId;
use dreamweek_core::calendar::{months_to_weeks, weeks_until};
use dreamweek_core::models::goal::{GoalKind, Recurrence};
use dreamweek_core::models::instance::{InstanceKind, WeekInstance};

use crate::config::SchedulerConfig;
use crate::countdown;
use crate::definition::{Definition, Origin};

/// Materialize `def` for `week_id`.
///
/// Recurring instances are always born open with a zero count. Deadline
/// instances read through the parent's completion instead, since the goal
/// and its instance share one "done" state.
pub fn build_instance(
    def: &Definition,
    week_id: WeekId,
    current_week_id: WeekId,
    config: &SchedulerConfig,
    now: jiff::Timestamp,
) -> WeekInstance {
    let recurrence = match (def.kind, def.origin) {
        (GoalKind::Deadline, _) => None,
        (GoalKind::Consistency, Origin::Freestanding) => def.recurrence,
        (GoalKind::Consistency, _) => Some(def.recurrence.unwrap_or(Recurrence::Weekly)),
    };

    // A stored zero means "not set": it would make the goal done before any check-in.
    let frequency = recurrence.map(|r| {
        def.frequency.filter(|&f| f > 0).unwrap_or(match r {
            Recurrence::Weekly => config.weekly_frequency,
            Recurrence::Monthly => config.monthly_frequency,
        })
    });

    let (kind, completed, completed_at) = match def.kind {
        GoalKind::Deadline => (InstanceKind::Deadline, def.completed, def.completed_at),
        GoalKind::Consistency => (InstanceKind::WeeklyGoal, false, None),
    };

    let id = match def.origin {
        Origin::Freestanding => def.id.clone(),
        Origin::Template | Origin::DreamGoal => WeekInstance::compose_id(&def.id, week_id),
    };

    WeekInstance {
        id,
        template_id: def.id.clone(),
        kind,
        title: def.title.clone(),
        dream_id: def.dream_id.clone(),
        dream_title: def.dream_title.clone(),
        week_id,
        recurrence,
        frequency,
        target_weeks: target_weeks(def, recurrence, week_id),
        weeks_remaining: countdown::weeks_remaining_at(def, week_id, current_week_id),
        target_date: def.target_date,
        completed,
        completed_at,
        skipped: false,
        skipped_at: None,
        completion_count: 0,
        completion_dates: Vec::new(),
        created_at: now,
    }
}

/// Total span of the goal in weeks, derived the same way for every source.
fn target_weeks(def: &Definition, recurrence: Option<Recurrence>, week_id: WeekId) -> Option<i32> {
    match (def.kind, recurrence) {
        (GoalKind::Deadline, _) => def
            .target_date
            .map(|date| weeks_until(date, week_id))
            .or(def.target_weeks),
        (GoalKind::Consistency, Some(Recurrence::Monthly)) => def
            .target_months
            .map(|m| months_to_weeks(m) as i32)
            .or(def.target_weeks),
        (GoalKind::Consistency, _) => def.target_weeks,
    }
}
