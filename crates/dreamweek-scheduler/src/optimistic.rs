//! The optimistic update protocol: `apply` the new value locally, `commit`
//! it to the store, and `rollback` to the snapshot when the commit fails.

use std::future::Future;

use tracing::debug;

use crate::local::LocalHandle;

/// A pending local change with its pre-mutation snapshot.
#[derive(Debug, Clone)]
pub struct OptimisticUpdate<T> {
    before: T,
    after: T,
}

impl<T: Clone + Send> OptimisticUpdate<T> {
    pub fn new(before: T, after: T) -> Self {
        Self { before, after }
    }

    pub fn before(&self) -> &T {
        &self.before
    }

    pub fn after(&self) -> &T {
        &self.after
    }

    /// Show the new value immediately.
    pub async fn apply(&self, target: &LocalHandle<T>) -> bool {
        target.replace(self.after.clone()).await
    }

    /// Restore the pre-mutation snapshot.
    pub async fn rollback(&self, target: &LocalHandle<T>) -> bool {
        let restored = target.replace(self.before.clone()).await;
        debug!(restored, "optimistic update rolled back");
        restored
    }

    /// Await `persist`; roll back the local value if it fails.
    pub async fn commit<R, E, F>(&self, target: &LocalHandle<T>, persist: F) -> Result<R, E>
    where
        F: Future<Output = Result<R, E>>,
    {
        match persist.await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.rollback(target).await;
                Err(e)
            }
        }
    }

    /// `apply` then `commit`.
    pub async fn run<R, E, F>(&self, target: &LocalHandle<T>, persist: F) -> Result<R, E>
    where
        F: Future<Output = Result<R, E>>,
    {
        self.apply(target).await;
        self.commit(target, persist).await
    }
}
