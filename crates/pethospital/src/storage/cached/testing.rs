//! Shared test doubles for the cached decorators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pethospital_core::cache::{Cache, CacheError, Result as CacheResult};

/// Cache over a plain map that ignores TTLs and counts writes.
pub(crate) struct MockCache {
    pub(crate) store: RwLock<HashMap<String, Vec<u8>>>,
    pub(crate) set_calls: AtomicUsize,
    broken: AtomicBool,
}

impl MockCache {
    pub(crate) fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            set_calls: AtomicUsize::new(0),
            broken: AtomicBool::new(false),
        }
    }

    /// Makes every operation fail from now on.
    pub(crate) fn break_connection(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    pub(crate) async fn contains(&self, key: &str) -> bool {
        self.store.read().await.contains_key(key)
    }

    fn check(&self) -> CacheResult<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("mock cache down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Cache for MockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.check()?;
        Ok(self.store.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
        self.check()?;
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.store
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.check()?;
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.check()?;
        self.store.write().await.clear();
        Ok(())
    }
}
