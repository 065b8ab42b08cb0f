//! # Rebuild Lock
//!
//! Serializes handlers that mutate the running binary or process. Contending
//! acquisitions queue on a real mutex. The guard releases on drop, so every
//! early return gives the lock back; only a handler that is about to exit the
//! process may keep it.

use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub type RebuildGuard = OwnedMutexGuard<()>;

#[derive(Clone, Default)]
pub struct RebuildLock {
    inner: Arc<Mutex<()>>,
}

impl RebuildLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> RebuildGuard {
        self.inner.clone().lock_owned().await
    }

    pub fn is_held(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_guard_releases_on_drop() {
        let lock = RebuildLock::new();
        assert!(!lock.is_held());
        {
            let _guard = lock.acquire().await;
            assert!(lock.is_held());
        }
        assert!(!lock.is_held());
    }

    #[tokio::test]
    async fn test_second_acquire_waits() {
        let lock = RebuildLock::new();
        let guard = lock.acquire().await;

        let contender = lock.clone();
        let waiter = tokio::spawn(async move {
            let _guard = contender.acquire().await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert!(!lock.is_held());
    }
}
