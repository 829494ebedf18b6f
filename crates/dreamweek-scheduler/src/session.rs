//! A per-user view of one week: owns the rendered instance list and routes
//! interactions through the scheduler.

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use dreamweek_core::WeekId;
use dreamweek_core::calendar::current_iso_week;
use dreamweek_core::models::instance::WeekInstance;

use crate::Scheduler;
use crate::completion::{CompletionOutcome, SkipOutcome, WeekTarget};
use crate::error::SchedulerError;
use crate::events::Topic;
use crate::instantiate::Instantiation;
use crate::local::{BoardHandle, WeekBoard};

pub struct WeekSession {
    scheduler: Scheduler,
    user_id: String,
    week_id: WeekId,
    board: WeekBoard,
}

impl WeekSession {
    pub fn new(scheduler: Scheduler, user_id: impl Into<String>, week_id: WeekId) -> Self {
        Self {
            scheduler,
            user_id: user_id.into(),
            week_id,
            board: WeekBoard::new(Vec::new()),
        }
    }

    /// A session for the ISO week containing today.
    pub fn current(scheduler: Scheduler, user_id: impl Into<String>) -> Self {
        Self::new(scheduler, user_id, current_iso_week())
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn week_id(&self) -> WeekId {
        self.week_id
    }

    /// Run instantiation and render its visible set.
    pub async fn load(&self) -> Instantiation {
        let result = self
            .scheduler
            .instantiate_week(&self.user_id, self.week_id, jiff::Timestamp::now())
            .await;
        self.board.handle().replace(result.visible.clone()).await;
        result
    }

    /// The currently rendered instances.
    pub async fn instances(&self) -> Vec<WeekInstance> {
        self.board.get().await
    }

    /// Weak handle to the rendered list.
    pub fn handle(&self) -> BoardHandle {
        self.board.handle()
    }

    pub async fn toggle(&self, instance_id: &str) -> Result<CompletionOutcome, SchedulerError> {
        let handle = self.handle();
        self.scheduler
            .toggle_completion(self.target(&handle), instance_id, jiff::Timestamp::now())
            .await
    }

    pub async fn increment(&self, instance_id: &str) -> Result<CompletionOutcome, SchedulerError> {
        let handle = self.handle();
        self.scheduler
            .increment(self.target(&handle), instance_id, jiff::Timestamp::now())
            .await
    }

    pub async fn decrement(&self, instance_id: &str) -> Result<CompletionOutcome, SchedulerError> {
        let handle = self.handle();
        self.scheduler
            .decrement(self.target(&handle), instance_id, jiff::Timestamp::now())
            .await
    }

    pub async fn skip(
        &self,
        instance_id: &str,
        confirm: impl FnOnce(&WeekInstance) -> bool,
    ) -> Result<SkipOutcome, SchedulerError> {
        let handle = self.handle();
        self.scheduler
            .skip(self.target(&handle), instance_id, confirm, jiff::Timestamp::now())
            .await
    }

    /// Re-run instantiation whenever goals or dreams change.
    ///
    /// The task holds the board weakly and exits on the first signal after
    /// the session is dropped.
    pub fn watch(&self) -> JoinHandle<()> {
        let mut rx = self.scheduler.bus().subscribe();
        let scheduler = self.scheduler.clone();
        let user_id = self.user_id.clone();
        let week_id = self.week_id;
        let board = self.handle();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(Topic::GoalsUpdated | Topic::DreamsUpdated) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
                if !board.is_attached() {
                    break;
                }
                let result = scheduler
                    .instantiate_week(&user_id, week_id, jiff::Timestamp::now())
                    .await;
                if !board.replace(result.visible).await {
                    break;
                }
                debug!(user_id = %user_id, week_id = %week_id, created = result.created.len(), "week refreshed");
            }
            info!(user_id = %user_id, week_id = %week_id, "week watch stopped");
        })
    }

    fn target<'a>(&'a self, handle: &'a BoardHandle) -> WeekTarget<'a> {
        WeekTarget {
            user_id: &self.user_id,
            week_id: self.week_id,
            board: handle,
        }
    }
}
