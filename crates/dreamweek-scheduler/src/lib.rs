//! dreamweek-scheduler
//!
//! Turns goal definitions attached to dreams into week-scoped instances and
//! tracks their completion.
//!
//! Public API:
//! - `Scheduler::instantiate_week()`: load a week and create missing instances
//! - `Scheduler::toggle_completion()` / `increment()` / `decrement()` / `skip()`:
//!   optimistic completion with rollback
//! - `Scheduler::sync_parent()`: mirror a deadline instance onto its goal and template
//! - `Scheduler::add_dream_goal()` / `reactivate_goal()` and friends: definition CRUD
//! - `WeekSession`: per-user handle owning the rendered instance list

pub mod builder;
pub mod completion;
pub mod config;
pub mod countdown;
pub mod definition;
pub mod eligibility;
pub mod error;
pub mod events;
pub mod goals;
pub mod instantiate;
pub mod local;
pub mod notify;
pub mod optimistic;
pub mod parent_sync;
pub mod refetch;
pub mod repair;
pub mod session;
pub mod streak;

use std::sync::Arc;

use dreamweek_storage::GoalStore;

pub use crate::completion::{CompletionOutcome, SkipOutcome, WeekTarget};
pub use crate::config::SchedulerConfig;
pub use crate::error::SchedulerError;
pub use crate::events::{EventBus, Topic};
pub use crate::goals::{GoalAdded, NewGoal};
pub use crate::instantiate::{Instantiation, WriteOutcome};
pub use crate::notify::{Notice, Notifier, TracingNotifier};
pub use crate::repair::RepairReport;
pub use crate::session::WeekSession;

/// Shared handle over the store, notifier and event bus.
///
/// Cheap to clone; every clone talks to the same collaborators.
#[derive(Clone)]
pub struct Scheduler {
    store: Arc<dyn GoalStore>,
    notifier: Arc<dyn Notifier>,
    bus: EventBus,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn GoalStore>,
        notifier: Arc<dyn Notifier>,
        bus: EventBus,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            bus,
            config,
        }
    }

    pub fn store(&self) -> &dyn GoalStore {
        self.store.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
