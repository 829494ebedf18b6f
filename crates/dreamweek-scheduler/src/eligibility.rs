//! Decides which definitions still need an instance for a week.

use std::collections::HashSet;

use tracing::debug;

use dreamweek_core::WeekId;
use dreamweek_core::models::instance::WeekInstance;

use crate::countdown;
use crate::definition::{Definition, Origin};

/// Why a definition gets no new instance. Rules are checked in this order
/// and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// The owning dream no longer exists (or was never recorded).
    OrphanedDream,
    Inactive,
    Completed,
    /// An instance was skipped this week; the goal sits the week out.
    SkippedThisWeek,
    /// The countdown went negative.
    Expired,
    AlreadyInstantiated,
}

/// What the filter knows about the target week.
#[derive(Debug, Clone, Copy)]
pub struct WeekContext<'a> {
    pub week_id: WeekId,
    pub existing: &'a [WeekInstance],
    pub skipped_template_ids: &'a HashSet<String>,
    pub dream_ids: &'a HashSet<String>,
}

/// Template ids of instances skipped in `existing`.
///
/// Must be built from the freshly fetched week, not a rendered copy, or a
/// goal skipped moments ago would be created again.
pub fn skipped_template_ids(existing: &[WeekInstance]) -> HashSet<String> {
    existing
        .iter()
        .filter(|i| i.skipped)
        .map(|i| i.template_id.clone())
        .collect()
}

/// The first rule excluding `def`, or `None` if it needs an instance.
pub fn exclusion(def: &Definition, ctx: &WeekContext<'_>) -> Option<Exclusion> {
    if def.origin != Origin::Freestanding {
        let dream_exists = def
            .dream_id
            .as_ref()
            .is_some_and(|id| ctx.dream_ids.contains(id));
        if !dream_exists {
            return Some(Exclusion::OrphanedDream);
        }
    }
    if !def.active {
        return Some(Exclusion::Inactive);
    }
    if def.completed {
        return Some(Exclusion::Completed);
    }
    if def.ids().any(|id| ctx.skipped_template_ids.contains(id)) {
        return Some(Exclusion::SkippedThisWeek);
    }
    if countdown::is_expired(def, ctx.week_id) {
        return Some(Exclusion::Expired);
    }
    if def.is_materialized(ctx.existing, ctx.week_id) {
        return Some(Exclusion::AlreadyInstantiated);
    }
    None
}

/// Definitions from `candidates` that need a new instance this week.
///
/// Ids already accepted earlier in the iteration are excluded too, so a
/// definition present in both sources is instantiated once.
pub fn eligible<'d>(
    candidates: impl IntoIterator<Item = &'d Definition>,
    ctx: &WeekContext<'_>,
) -> Vec<&'d Definition> {
    let mut seen = HashSet::new();
    let mut accepted = Vec::new();

    for def in candidates {
        if !seen.insert(def.id.as_str()) {
            debug!(definition_id = %def.id, "duplicate definition ignored");
            continue;
        }
        match exclusion(def, ctx) {
            Some(reason) => {
                debug!(definition_id = %def.id, week_id = %ctx.week_id, ?reason, "definition excluded");
            }
            None => accepted.push(def),
        }
    }

    accepted
}
