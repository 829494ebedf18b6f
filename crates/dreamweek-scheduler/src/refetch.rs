//! Re-fetch, mutate, save.
//!
//! Week and dream documents are written whole, so a write built from a copy
//! captured earlier would erase anything saved since. Every mutation outside
//! the initial instantiation goes through these helpers, which read the
//! authoritative document immediately before applying the change.
//!
//! This narrows the race but does not close it: two writers that interleave
//! between the read and the write still resolve as last-write-wins.

use tracing::debug;

use dreamweek_core::WeekId;
use dreamweek_core::models::dream::DreamDocument;
use dreamweek_core::models::instance::WeekInstance;
use dreamweek_core::models::week::WeekDocument;
use dreamweek_storage::GoalStore;

use crate::error::SchedulerError;

/// Apply `mutate` to the freshly fetched instance list of a week and save it.
///
/// A missing week document is treated as empty. Nothing is written when
/// `mutate` fails or leaves the stored list as it was.
pub async fn mutate_week<R, F>(
    store: &dyn GoalStore,
    user_id: &str,
    week_id: WeekId,
    mutate: F,
) -> Result<(WeekDocument, R), SchedulerError>
where
    F: FnOnce(&mut Vec<WeekInstance>) -> Result<R, SchedulerError> + Send,
    R: Send,
{
    let fetched = store.get_week(user_id, week_id).await?;
    let mut goals = fetched
        .as_ref()
        .map(|doc| doc.goals.clone())
        .unwrap_or_default();

    let out = mutate(&mut goals)?;
    if let Some(doc) = fetched.filter(|doc| doc.goals == goals) {
        debug!(user_id, week_id = %week_id, "week unchanged, nothing to save");
        return Ok((doc, out));
    }
    let saved = store.save_week(user_id, week_id, goals).await?;
    debug!(user_id, week_id = %week_id, goals = saved.goals.len(), "week re-fetched and saved");
    Ok((saved, out))
}

/// Apply `mutate` to the freshly fetched dream document and save dreams and
/// templates together in one write.
pub async fn mutate_dreams<R, F>(
    store: &dyn GoalStore,
    user_id: &str,
    mutate: F,
) -> Result<R, SchedulerError>
where
    F: FnOnce(&mut DreamDocument) -> Result<R, SchedulerError> + Send,
    R: Send,
{
    let mut doc = store.get_dreams(user_id).await?;
    let out = mutate(&mut doc)?;
    store.save_dreams(user_id, doc.dreams, doc.templates).await?;
    debug!(user_id, "dreams re-fetched and saved");
    Ok(out)
}
