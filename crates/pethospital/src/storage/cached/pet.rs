//! Cached pet repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use pethospital_core::cache::{owned_pet_key, pet_key, pets_by_owner_key, Cache};
use pethospital_core::hospital::{Pet, PetUpdate};
use pethospital_core::storage::{PetRepository, Result};

use super::ReadThrough;

/// Cached pet repository decorator.
///
/// Writes invalidate the owner's listing; updates additionally drop the
/// pet's by-id and owner-scoped entries so a soft delete is seen at once.
pub struct CachedPetRepository<R, C>
where
    R: PetRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: ReadThrough<C>,
}

impl<R, C> CachedPetRepository<R, C>
where
    R: PetRepository,
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
impl<R, C> PetRepository for CachedPetRepository<R, C>
where
    R: PetRepository + 'static,
    C: Cache + 'static,
{
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Pet>> {
        self.cache
            .get_or_load(&pets_by_owner_key(owner_id), || {
                self.repository.find_by_owner(owner_id)
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pet>> {
        self.cache
            .get_or_load_some(&pet_key(id), || self.repository.find_by_id(id))
            .await
    }

    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Pet>> {
        self.cache
            .get_or_load_some(&owned_pet_key(id, owner_id), || {
                self.repository.find_owned(id, owner_id)
            })
            .await
    }

    async fn create(&self, pet: &Pet) -> Result<()> {
        self.repository.create(pet).await?;

        self.cache.invalidate([pets_by_owner_key(pet.owner_id)]).await;

        tracing::debug!(pet_id = %pet.id, owner_id = %pet.owner_id, "Pet created");
        Ok(())
    }

    async fn update_by_id(&self, id: Uuid, update: &PetUpdate) -> Result<Pet> {
        let pet = self.repository.update_by_id(id, update).await?;

        self.cache
            .invalidate([
                pets_by_owner_key(pet.owner_id),
                pet_key(id),
                owned_pet_key(id, pet.owner_id),
            ])
            .await;

        tracing::debug!(pet_id = %id, owner_id = %pet.owner_id, "Pet updated");
        Ok(pet)
    }
}
