//! Locally rendered state, owned by a session and observed weakly by the
//! engines that update it.
//!
//! Once the owning [`LocalState`] is dropped every write through a
//! [`LocalHandle`] becomes a no-op, so an in-flight save that finishes
//! after the view went away cannot resurrect it.

use std::sync::{Arc, Weak};

use tokio::sync::Mutex;

use dreamweek_core::models::instance::WeekInstance;

/// The instance list shown for one user-week.
pub type WeekBoard = LocalState<Vec<WeekInstance>>;
pub type BoardHandle = LocalHandle<Vec<WeekInstance>>;

#[derive(Debug, Default)]
pub struct LocalState<T> {
    inner: Arc<Mutex<T>>,
}

impl<T: Clone> LocalState<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    pub fn handle(&self) -> LocalHandle<T> {
        LocalHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub async fn get(&self) -> T {
        self.inner.lock().await.clone()
    }
}

#[derive(Debug)]
pub struct LocalHandle<T> {
    inner: Weak<Mutex<T>>,
}

impl<T> Clone for LocalHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> LocalHandle<T> {
    /// A handle that was never attached to any state.
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Current value, or `None` once the owner is gone.
    pub async fn snapshot(&self) -> Option<T> {
        let inner = self.inner.upgrade()?;
        let value = inner.lock().await.clone();
        Some(value)
    }

    /// Replace the value. Returns `false` (and does nothing) once the owner is gone.
    pub async fn replace(&self, value: T) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                *inner.lock().await = value;
                true
            }
            None => false,
        }
    }

    /// Edit the value in place. Returns `false` once the owner is gone.
    pub async fn update(&self, edit: impl FnOnce(&mut T)) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                edit(&mut *inner.lock().await);
                true
            }
            None => false,
        }
    }
}
