//! Document key conventions.
//!
//! Pure string functions with no storage dependency. These define the canonical
//! layout of per-user documents in the Dreamweek bucket.

use crate::calendar::WeekId;

pub fn week(user_id: &str, week_id: WeekId) -> String {
    format!("users/{user_id}/weeks/{week_id}.json")
}

pub fn weeks_prefix(user_id: &str) -> String {
    format!("users/{user_id}/weeks/")
}

/// Dreams and legacy templates share one object so a single PUT covers both.
pub fn dreams(user_id: &str) -> String {
    format!("users/{user_id}/dreams.json")
}

/// Week id encoded in a week document key, if the key is one.
pub fn week_id_from_key(key: &str) -> Option<WeekId> {
    let file = key.rsplit('/').next()?;
    file.strip_suffix(".json")?.parse().ok()
}
