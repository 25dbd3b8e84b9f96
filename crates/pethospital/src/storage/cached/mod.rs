//! Cached repository decorators.
//!
//! Each decorator wraps a repository and implements the same trait, so
//! callers cannot tell cached from uncached. They follow the cache-aside
//! pattern:
//!
//! - **Reads**: Check cache first, on miss fetch from repository and populate cache
//! - **Writes**: Persist to repository, then delete every cache key derivable
//!   from the written record
//!
//! Concurrent misses for one key are collapsed by [`SingleFlight`]: the first
//! caller loads, the others wait and then read what it stored.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let repo = Arc::new(InMemoryRepository::new());
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let pets = CachedPetRepository::new(repo, cache, Duration::from_secs(60));
//! ```

mod appointment;
mod pet;
mod user;
mod veterinarian;

#[cfg(test)]
mod testing;

pub use appointment::CachedAppointmentRepository;
pub use pet::CachedPetRepository;
pub use user::CachedUserRepository;
pub use veterinarian::CachedVeterinarianRepository;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use pethospital_core::cache::{deserialize_value, serialize_value, Cache};
use pethospital_core::storage::Result;

use crate::cache::SingleFlight;

/// Read-through access to a shared cache with a fixed TTL.
///
/// Cache failures are logged and treated as misses; only the loader's
/// errors reach the caller, and a failed load stores nothing.
pub(crate) struct ReadThrough<C: Cache> {
    cache: Arc<C>,
    flight: SingleFlight,
    ttl: Duration,
}

impl<C: Cache> ReadThrough<C> {
    pub(crate) fn new(cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            cache,
            flight: SingleFlight::new(),
            ttl,
        }
    }

    /// Returns the cached value for `key`, or loads and caches it.
    pub(crate) async fn get_or_load<T, F, Fut>(&self, key: &str, load: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        if let Some(value) = self.lookup(key).await {
            return Ok(value);
        }

        let _flight = self.flight.acquire(key).await;
        // Another caller may have filled the key while we waited.
        if let Some(value) = self.lookup(key).await {
            return Ok(value);
        }

        tracing::trace!(key, "Cache miss");
        let value = load().await?;
        self.store(key, &value).await;
        Ok(value)
    }

    /// Like [`get_or_load`](Self::get_or_load), but a `None` result is not cached.
    pub(crate) async fn get_or_load_some<T, F, Fut>(&self, key: &str, load: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<T>>> + Send,
    {
        if let Some(value) = self.lookup(key).await {
            return Ok(Some(value));
        }

        let _flight = self.flight.acquire(key).await;
        if let Some(value) = self.lookup(key).await {
            return Ok(Some(value));
        }

        tracing::trace!(key, "Cache miss");
        let value = load().await?;
        if let Some(found) = &value {
            self.store(key, found).await;
        }
        Ok(value)
    }

    /// Deletes every key, logging failures instead of returning them.
    pub(crate) async fn invalidate<I>(&self, keys: I)
    where
        I: IntoIterator<Item = String> + Send,
        I::IntoIter: Send,
    {
        for key in keys {
            if let Err(err) = self.cache.delete(&key).await {
                tracing::warn!(key = %key, error = %err, "Failed to invalidate cache key");
            }
        }
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match deserialize_value(&bytes) {
                Ok(value) => {
                    tracing::trace!(key, "Cache hit");
                    Some(value)
                }
                Err(err) => {
                    // Treat as a miss; the reload overwrites the entry.
                    tracing::warn!(key, error = %err, "Cache entry deserialization failed");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(key, error = %err, "Cache read failed");
                None
            }
        }
    }

    async fn store<T: Serialize + Sync>(&self, key: &str, value: &T) {
        let bytes = match serialize_value(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key, error = %err, "Cache entry serialization failed");
                return;
            }
        };
        if let Err(err) = self.cache.set(key, &bytes, Some(self.ttl)).await {
            tracing::warn!(key, error = %err, "Failed to populate cache");
        }
    }
}
