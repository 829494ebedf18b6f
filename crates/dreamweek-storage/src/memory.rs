use std::collections::HashMap;

use tokio::sync::RwLock;

use dreamweek_core::WeekId;
use dreamweek_core::models::dream::{Dream, DreamDocument};
use dreamweek_core::models::instance::WeekInstance;
use dreamweek_core::models::template::Template;
use dreamweek_core::models::week::WeekDocument;

use crate::error::StorageError;
use crate::store::{BoxFuture, GoalStore};

/// Process-local goal store with the same whole-document semantics as S3.
/// Used for local runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    weeks: RwLock<HashMap<(String, WeekId), WeekDocument>>,
    dreams: RwLock<HashMap<String, DreamDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's dream document.
    pub async fn put_dreams(&self, user_id: &str, doc: DreamDocument) {
        self.dreams.write().await.insert(user_id.to_string(), doc);
    }
}

impl GoalStore for MemoryStore {
    fn get_week<'a>(
        &'a self,
        user_id: &'a str,
        week_id: WeekId,
    ) -> BoxFuture<'a, Result<Option<WeekDocument>, StorageError>> {
        Box::pin(async move {
            let weeks = self.weeks.read().await;
            Ok(weeks.get(&(user_id.to_string(), week_id)).cloned())
        })
    }

    fn save_week<'a>(
        &'a self,
        user_id: &'a str,
        week_id: WeekId,
        goals: Vec<WeekInstance>,
    ) -> BoxFuture<'a, Result<WeekDocument, StorageError>> {
        Box::pin(async move {
            let doc = WeekDocument::stamped(week_id, goals, jiff::Timestamp::now());
            self.weeks
                .write()
                .await
                .insert((user_id.to_string(), week_id), doc.clone());
            Ok(doc)
        })
    }

    fn get_dreams<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<DreamDocument, StorageError>> {
        Box::pin(async move {
            let dreams = self.dreams.read().await;
            Ok(dreams.get(user_id).cloned().unwrap_or_default())
        })
    }

    fn save_dreams<'a>(
        &'a self,
        user_id: &'a str,
        dreams: Vec<Dream>,
        templates: Vec<Template>,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let doc = DreamDocument {
                dreams,
                templates,
                updated_at: Some(jiff::Timestamp::now()),
            };
            self.dreams.write().await.insert(user_id.to_string(), doc);
            Ok(())
        })
    }

    fn list_weeks<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Vec<WeekId>, StorageError>> {
        Box::pin(async move {
            let weeks = self.weeks.read().await;
            let mut listed: Vec<WeekId> = weeks
                .keys()
                .filter(|(owner, _)| owner == user_id)
                .map(|(_, week)| *week)
                .collect();
            listed.sort();
            Ok(listed)
        })
    }
}
