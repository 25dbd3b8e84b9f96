use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Key/value cache with per-entry expiry.
///
/// Values are opaque bytes; callers serialize with
/// [`serialize_value`](super::serialize_value). A miss and an expired entry
/// look the same to the caller.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a live value by key. Expired entries are dropped and reported as a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a value, replacing any existing one. `None` means no expiry.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value by key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every entry.
    async fn clear(&self) -> Result<()>;
}
