//! Instantiation: load a week, create the instances it is missing, persist
//! once, and expose what the user should see.
//!
//! This path never fails outward. Fetch failures degrade to whatever is
//! already persisted; a failed save falls back to the pre-expansion set so
//! the next load retries from the same state.

use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use dreamweek_core::WeekId;
use dreamweek_core::models::instance::WeekInstance;

use crate::Scheduler;
use crate::builder::build_instance;
use crate::countdown;
use crate::definition::{Candidates, collect_candidates};
use crate::eligibility::{self, WeekContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Nothing new to create; no write was issued.
    NotNeeded,
    Written,
    /// New instances were computed but could not be saved.
    Failed,
    /// The week could not be read, so no write was attempted.
    Withheld,
}

/// Result of one instantiation pass.
#[derive(Debug, Clone)]
pub struct Instantiation {
    pub week_id: WeekId,
    /// Instances to render: skipped and expired ones removed.
    pub visible: Vec<WeekInstance>,
    /// Ids of instances created by this pass (even if the write failed).
    pub created: Vec<String>,
    pub write: WriteOutcome,
    /// A fetch failed and the result may be incomplete.
    pub degraded: bool,
}

impl Scheduler {
    /// Bring the week document for `(user_id, week_id)` up to date with the
    /// user's definitions.
    ///
    /// Idempotent: a second pass with no change in between writes nothing.
    pub async fn instantiate_week(
        &self,
        user_id: &str,
        week_id: WeekId,
        now: jiff::Timestamp,
    ) -> Instantiation {
        let existing = match self.store().get_week(user_id, week_id).await {
            Ok(doc) => doc.map(|d| d.goals).unwrap_or_default(),
            Err(e) => {
                // Writing now would replace a document we could not read.
                warn!(user_id, week_id = %week_id, error = %e, "week fetch failed, showing empty week");
                return Instantiation {
                    week_id,
                    visible: Vec::new(),
                    created: Vec::new(),
                    write: WriteOutcome::Withheld,
                    degraded: true,
                };
            }
        };
        let mut degraded = false;

        let (candidates, dream_ids) = match self.store().get_dreams(user_id).await {
            Ok(doc) => {
                let dream_ids: HashSet<String> = doc.dreams.iter().map(|d| d.id.clone()).collect();
                (collect_candidates(&doc), dream_ids)
            }
            Err(e) => {
                warn!(user_id, error = %e, "dream fetch failed, no new instances this pass");
                degraded = true;
                (Candidates::default(), HashSet::new())
            }
        };

        let skipped = eligibility::skipped_template_ids(&existing);
        let ctx = WeekContext {
            week_id,
            existing: &existing,
            skipped_template_ids: &skipped,
            dream_ids: &dream_ids,
        };

        let fresh: Vec<WeekInstance> = eligibility::eligible(candidates.iter(), &ctx)
            .into_iter()
            .map(|def| build_instance(def, week_id, week_id, self.config(), now))
            .collect();
        let created: Vec<String> = fresh.iter().map(|i| i.id.clone()).collect();

        if fresh.is_empty() {
            debug!(user_id, week_id = %week_id, existing = existing.len(), "week already up to date");
            return Instantiation {
                week_id,
                visible: visible_instances(&existing),
                created,
                write: WriteOutcome::NotNeeded,
                degraded,
            };
        }

        let mut expanded = existing.clone();
        expanded.extend(fresh);

        match self.store().save_week(user_id, week_id, expanded).await {
            Ok(saved) => {
                info!(user_id, week_id = %week_id, created = created.len(), "week instances created");
                Instantiation {
                    week_id,
                    visible: visible_instances(&saved.goals),
                    created,
                    write: WriteOutcome::Written,
                    degraded,
                }
            }
            Err(e) => {
                error!(
                    user_id,
                    week_id = %week_id,
                    error = %e,
                    pending = created.len(),
                    "failed to save new week instances, showing persisted set"
                );
                Instantiation {
                    week_id,
                    visible: visible_instances(&existing),
                    created,
                    write: WriteOutcome::Failed,
                    degraded,
                }
            }
        }
    }
}

/// Instances the user should see: skipped ones and deadlines whose
/// recomputed countdown went negative are hidden.
pub fn visible_instances(goals: &[WeekInstance]) -> Vec<WeekInstance> {
    goals
        .iter()
        .filter(|i| !i.skipped && !countdown::instance_expired(i))
        .cloned()
        .collect()
}
