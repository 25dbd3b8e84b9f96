//! Cached veterinarian repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use pethospital_core::cache::{approved_veterinarians_key, veterinarian_key, Cache};
use pethospital_core::hospital::{Veterinarian, VeterinarianUpdate};
use pethospital_core::storage::{Result, VeterinarianRepository};

use super::ReadThrough;

/// Cached veterinarian repository decorator.
pub struct CachedVeterinarianRepository<R, C>
where
    R: VeterinarianRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: ReadThrough<C>,
}

impl<R, C> CachedVeterinarianRepository<R, C>
where
    R: VeterinarianRepository,
    C: Cache,
{
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            repository,
            cache: ReadThrough::new(cache, ttl),
        }
    }
}

#[async_trait]
impl<R, C> VeterinarianRepository for CachedVeterinarianRepository<R, C>
where
    R: VeterinarianRepository + 'static,
    C: Cache + 'static,
{
    async fn list_approved(&self) -> Result<Vec<Veterinarian>> {
        self.cache
            .get_or_load(&approved_veterinarians_key(), || {
                self.repository.list_approved()
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Veterinarian>> {
        self.cache
            .get_or_load_some(&veterinarian_key(id), || self.repository.find_by_id(id))
            .await
    }

    async fn create(&self, vet: &Veterinarian) -> Result<()> {
        self.repository.create(vet).await?;

        self.cache.invalidate([approved_veterinarians_key()]).await;

        tracing::debug!(veterinarian_id = %vet.id, "Veterinarian created");
        Ok(())
    }

    async fn update_by_id(&self, id: Uuid, update: &VeterinarianUpdate) -> Result<Veterinarian> {
        let vet = self.repository.update_by_id(id, update).await?;

        self.cache
            .invalidate([approved_veterinarians_key(), veterinarian_key(id)])
            .await;

        tracing::debug!(
            veterinarian_id = %id,
            approved = vet.is_approved,
            "Veterinarian updated"
        );
        Ok(vet)
    }
}
