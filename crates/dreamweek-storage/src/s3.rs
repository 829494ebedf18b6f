use aws_sdk_s3::Client;
use tracing::debug;

use dreamweek_core::WeekId;
use dreamweek_core::keys;
use dreamweek_core::models::dream::{Dream, DreamDocument};
use dreamweek_core::models::instance::WeekInstance;
use dreamweek_core::models::template::Template;
use dreamweek_core::models::week::WeekDocument;

use crate::error::StorageError;
use crate::objects;
use crate::store::{BoxFuture, GoalStore};

/// Goal documents stored as JSON objects in one S3 bucket.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl GoalStore for S3Store {
    fn get_week<'a>(
        &'a self,
        user_id: &'a str,
        week_id: WeekId,
    ) -> BoxFuture<'a, Result<Option<WeekDocument>, StorageError>> {
        Box::pin(async move {
            let key = keys::week(user_id, week_id);
            objects::get_json(&self.client, &self.bucket, &key).await
        })
    }

    fn save_week<'a>(
        &'a self,
        user_id: &'a str,
        week_id: WeekId,
        goals: Vec<WeekInstance>,
    ) -> BoxFuture<'a, Result<WeekDocument, StorageError>> {
        Box::pin(async move {
            let key = keys::week(user_id, week_id);
            let doc = WeekDocument::stamped(week_id, goals, jiff::Timestamp::now());
            objects::put_json(&self.client, &self.bucket, &key, &doc).await?;
            debug!(user_id, week_id = %week_id, goals = doc.goals.len(), "week document saved");
            Ok(doc)
        })
    }

    fn get_dreams<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<DreamDocument, StorageError>> {
        Box::pin(async move {
            let key = keys::dreams(user_id);
            let doc = objects::get_json(&self.client, &self.bucket, &key).await?;
            Ok(doc.unwrap_or_default())
        })
    }

    fn save_dreams<'a>(
        &'a self,
        user_id: &'a str,
        dreams: Vec<Dream>,
        templates: Vec<Template>,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let key = keys::dreams(user_id);
            let doc = DreamDocument {
                dreams,
                templates,
                updated_at: Some(jiff::Timestamp::now()),
            };
            objects::put_json(&self.client, &self.bucket, &key, &doc).await?;
            debug!(user_id, dreams = doc.dreams.len(), templates = doc.templates.len(), "dream document saved");
            Ok(())
        })
    }

    fn list_weeks<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Vec<WeekId>, StorageError>> {
        Box::pin(async move {
            let prefix = keys::weeks_prefix(user_id);
            let listed = objects::list_keys(&self.client, &self.bucket, &prefix).await?;
            let mut weeks: Vec<WeekId> = listed
                .iter()
                .filter_map(|key| keys::week_id_from_key(key))
                .collect();
            weeks.sort();
            Ok(weeks)
        })
    }
}
