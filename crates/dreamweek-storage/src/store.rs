use std::future::Future;
use std::pin::Pin;

use dreamweek_core::WeekId;
use dreamweek_core::models::dream::{Dream, DreamDocument};
use dreamweek_core::models::instance::WeekInstance;
use dreamweek_core::models::template::Template;
use dreamweek_core::models::week::WeekDocument;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The persistence port the scheduler is written against.
///
/// Every call is atomic on its own but nothing is transactional across
/// calls. Documents are read in full and written in full; there is no
/// field-level patching and no version token, so the last write wins.
///
/// Methods return boxed futures for dyn compatibility.
pub trait GoalStore: Send + Sync {
    /// The week document for `(user_id, week_id)`. `None` if never written.
    fn get_week<'a>(
        &'a self,
        user_id: &'a str,
        week_id: WeekId,
    ) -> BoxFuture<'a, Result<Option<WeekDocument>, StorageError>>;

    /// Replace the full instance list of a week. Returns the stored document.
    fn save_week<'a>(
        &'a self,
        user_id: &'a str,
        week_id: WeekId,
        goals: Vec<WeekInstance>,
    ) -> BoxFuture<'a, Result<WeekDocument, StorageError>>;

    /// The user's dreams and legacy templates. Empty if never written.
    fn get_dreams<'a>(&'a self, user_id: &'a str)
    -> BoxFuture<'a, Result<DreamDocument, StorageError>>;

    /// Replace dreams and templates together in one write.
    fn save_dreams<'a>(
        &'a self,
        user_id: &'a str,
        dreams: Vec<Dream>,
        templates: Vec<Template>,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Weeks that have a stored document, oldest first.
    fn list_weeks<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Vec<WeekId>, StorageError>>;
}
