#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dreamweek_core::WeekId;
use dreamweek_core::models::dream::{Dream, DreamDocument};
use dreamweek_core::models::goal::{Goal, GoalKind, Recurrence};
use dreamweek_core::models::instance::WeekInstance;
use dreamweek_core::models::template::{TEMPLATE_DOC_TYPE, Template};
use dreamweek_core::models::week::WeekDocument;
use dreamweek_scheduler::{EventBus, Notice, Notifier, Scheduler, SchedulerConfig};
use dreamweek_storage::{BoxFuture, GoalStore, MemoryStore, StorageError};

pub const USER: &str = "u1";

pub fn week(s: &str) -> WeekId {
    s.parse().unwrap()
}

pub fn date(s: &str) -> jiff::civil::Date {
    s.parse().unwrap()
}

pub fn now() -> jiff::Timestamp {
    "2025-03-05T12:00:00Z".parse().unwrap()
}

pub fn dream(id: &str, goals: Vec<Goal>) -> Dream {
    Dream {
        id: id.to_string(),
        title: format!("Dream {id}"),
        category: "health".to_string(),
        progress: 0,
        goals,
        milestones: Vec::new(),
        notes: Vec::new(),
        history: Vec::new(),
        created_at: jiff::Timestamp::UNIX_EPOCH,
        updated_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

pub fn weekly_goal(id: &str, frequency: Option<u32>) -> Goal {
    Goal {
        id: id.to_string(),
        title: format!("Goal {id}"),
        kind: GoalKind::Consistency,
        recurrence: Some(Recurrence::Weekly),
        frequency,
        target_weeks: None,
        target_months: None,
        target_date: None,
        weeks_remaining: None,
        start_week: None,
        active: true,
        completed: false,
        completed_at: None,
        paused_at_completion: false,
        created_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

pub fn deadline_goal(id: &str, target_date: &str) -> Goal {
    Goal {
        kind: GoalKind::Deadline,
        recurrence: None,
        target_date: Some(date(target_date)),
        ..weekly_goal(id, None)
    }
}

pub fn template(id: &str, dream_id: Option<&str>, frequency: Option<u32>) -> Template {
    Template {
        id: id.to_string(),
        doc_type: TEMPLATE_DOC_TYPE.to_string(),
        title: format!("Template {id}"),
        dream_id: dream_id.map(str::to_string),
        dream_title: None,
        goal_id: None,
        goal_type: GoalKind::Consistency,
        recurrence: Some(Recurrence::Weekly),
        frequency,
        target_weeks: None,
        target_months: None,
        target_date: None,
        weeks_remaining: None,
        start_week: None,
        active: true,
        completed: false,
        completed_at: None,
        paused_at_completion: false,
        created_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

pub fn documents(dreams: Vec<Dream>, templates: Vec<Template>) -> DreamDocument {
    DreamDocument {
        dreams,
        templates,
        updated_at: None,
    }
}

/// A [`MemoryStore`] that can be told to fail, and counts successful writes.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_week_reads: AtomicBool,
    pub fail_week_writes: AtomicBool,
    pub fail_dream_reads: AtomicBool,
    pub fail_dream_writes: AtomicBool,
    week_writes: AtomicUsize,
    dream_writes: AtomicUsize,
}

impl FlakyStore {
    pub fn week_writes(&self) -> usize {
        self.week_writes.load(Ordering::SeqCst)
    }

    pub fn dream_writes(&self) -> usize {
        self.dream_writes.load(Ordering::SeqCst)
    }

    pub fn set(flag: &AtomicBool, on: bool) {
        flag.store(on, Ordering::SeqCst);
    }

    pub async fn week_doc(&self, week_id: WeekId) -> Option<WeekDocument> {
        self.inner.get_week(USER, week_id).await.unwrap()
    }

    pub async fn dreams_doc(&self) -> DreamDocument {
        self.inner.get_dreams(USER).await.unwrap()
    }
}

fn injected(key: &str) -> StorageError {
    StorageError::PutObject(format!("{key}: injected failure"))
}

impl GoalStore for FlakyStore {
    fn get_week<'a>(
        &'a self,
        user_id: &'a str,
        week_id: WeekId,
    ) -> BoxFuture<'a, Result<Option<WeekDocument>, StorageError>> {
        Box::pin(async move {
            if self.fail_week_reads.load(Ordering::SeqCst) {
                return Err(StorageError::GetObject(format!("{week_id}: injected failure")));
            }
            self.inner.get_week(user_id, week_id).await
        })
    }

    fn save_week<'a>(
        &'a self,
        user_id: &'a str,
        week_id: WeekId,
        goals: Vec<WeekInstance>,
    ) -> BoxFuture<'a, Result<WeekDocument, StorageError>> {
        Box::pin(async move {
            if self.fail_week_writes.load(Ordering::SeqCst) {
                return Err(injected(&week_id.to_string()));
            }
            let doc = self.inner.save_week(user_id, week_id, goals).await?;
            self.week_writes.fetch_add(1, Ordering::SeqCst);
            Ok(doc)
        })
    }

    fn get_dreams<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<DreamDocument, StorageError>> {
        Box::pin(async move {
            if self.fail_dream_reads.load(Ordering::SeqCst) {
                return Err(StorageError::GetObject("dreams: injected failure".to_string()));
            }
            self.inner.get_dreams(user_id).await
        })
    }

    fn save_dreams<'a>(
        &'a self,
        user_id: &'a str,
        dreams: Vec<Dream>,
        templates: Vec<Template>,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            if self.fail_dream_writes.load(Ordering::SeqCst) {
                return Err(injected("dreams"));
            }
            self.inner.save_dreams(user_id, dreams, templates).await?;
            self.dream_writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn list_weeks<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Vec<WeekId>, StorageError>> {
        self.inner.list_weeks(user_id)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct Harness {
    pub store: Arc<FlakyStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub scheduler: Scheduler,
}

impl Harness {
    pub async fn with_dreams(doc: DreamDocument) -> Self {
        let store = Arc::new(FlakyStore::default());
        store.inner.put_dreams(USER, doc).await;
        let notifier = Arc::new(RecordingNotifier::default());
        let config = SchedulerConfig::default();
        let scheduler = Scheduler::new(
            store.clone(),
            notifier.clone(),
            EventBus::new(config.event_capacity),
            config,
        );
        Self {
            store,
            notifier,
            scheduler,
        }
    }
}
