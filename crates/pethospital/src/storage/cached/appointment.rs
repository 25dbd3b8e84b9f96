//! Cached appointment repository decorator.
//!
//! Wraps an `AppointmentRepository` with the cache-aside pattern. Conflict
//! checks always go to the repository: a stale "slot is free" answer would
//! double-book a veterinarian.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use pethospital_core::cache::{
    appointment_for_role_key, appointment_for_role_keys, appointments_by_user_key,
    appointments_by_veterinarian_key, Cache,
};
use pethospital_core::hospital::{Actor, Appointment, AppointmentDetails, AppointmentUpdate};
use pethospital_core::storage::{AppointmentRepository, BookingSlot, Result};

use super::ReadThrough;

/// Cached appointment repository decorator.
///
/// - **Reads**: user and veterinarian listings and role-scoped lookups are
///   read-through; `find_conflict` is never cached
/// - **Writes**: persist, then drop the owning user's and veterinarian's
///   listings; updates also drop every role-scoped entry for the record
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedAppointmentRepository<R, C>
where
    R: AppointmentRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: ReadThrough<C>,
}

impl<R, C> CachedAppointmentRepository<R, C>
where
    R: AppointmentRepository,
    C: Cache,
{
    /// Creates a new cached appointment repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The shared cache
    /// * `ttl` - Time-to-live for cached lookups
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            repository,
            cache: ReadThrough::new(cache, ttl),
        }
    }

    fn listing_keys(appointment: &Appointment) -> [String; 2] {
        [
            appointments_by_user_key(appointment.user_id),
            appointments_by_veterinarian_key(appointment.veterinarian_id),
        ]
    }
}

#[async_trait]
impl<R, C> AppointmentRepository for CachedAppointmentRepository<R, C>
where
    R: AppointmentRepository + 'static,
    C: Cache + 'static,
{
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<AppointmentDetails>> {
        self.cache
            .get_or_load(&appointments_by_user_key(user_id), || {
                self.repository.find_by_user(user_id)
            })
            .await
    }

    async fn find_by_veterinarian(&self, vet_id: Uuid) -> Result<Vec<AppointmentDetails>> {
        self.cache
            .get_or_load(&appointments_by_veterinarian_key(vet_id), || {
                self.repository.find_by_veterinarian(vet_id)
            })
            .await
    }

    async fn find_by_id_for_role(
        &self,
        id: Uuid,
        actor: &Actor,
    ) -> Result<Option<AppointmentDetails>> {
        self.cache
            .get_or_load_some(&appointment_for_role_key(id, actor), || {
                self.repository.find_by_id_for_role(id, actor)
            })
            .await
    }

    async fn find_conflict(&self, slot: &BookingSlot) -> Result<Option<Appointment>> {
        self.repository.find_conflict(slot).await
    }

    async fn create(&self, appointment: &Appointment) -> Result<AppointmentDetails> {
        // 1. Persist to storage
        let details = self.repository.create(appointment).await?;

        // 2. Drop the listings the new booking belongs to
        self.cache
            .invalidate(Self::listing_keys(&details.appointment))
            .await;

        tracing::debug!(
            appointment_id = %appointment.id,
            user_id = %appointment.user_id,
            veterinarian_id = %appointment.veterinarian_id,
            "Appointment created"
        );
        Ok(details)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        update: &AppointmentUpdate,
    ) -> Result<AppointmentDetails> {
        // 1. Persist to storage
        let details = self.repository.update_by_id(id, update).await?;
        let appointment = &details.appointment;

        // 2. Drop the listings and every role-scoped view of the record
        let keys = Self::listing_keys(appointment).into_iter().chain(
            appointment_for_role_keys(id, appointment.user_id, appointment.veterinarian_id),
        );
        self.cache.invalidate(keys).await;

        tracing::debug!(
            appointment_id = %id,
            status = ?appointment.status,
            "Appointment updated"
        );
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    use pethospital_core::hospital::AppointmentStatus;
    use pethospital_core::storage::{schedule_order, RepositoryError};

    use crate::storage::cached::testing::MockCache;

    // Mock repository that tracks calls
    struct MockAppointmentRepository {
        appointments: RwLock<HashMap<Uuid, Appointment>>,
        find_by_user_calls: AtomicUsize,
        find_by_veterinarian_calls: AtomicUsize,
        find_for_role_calls: AtomicUsize,
        find_conflict_calls: AtomicUsize,
    }

    impl MockAppointmentRepository {
        fn new() -> Self {
            Self {
                appointments: RwLock::new(HashMap::new()),
                find_by_user_calls: AtomicUsize::new(0),
                find_by_veterinarian_calls: AtomicUsize::new(0),
                find_for_role_calls: AtomicUsize::new(0),
                find_conflict_calls: AtomicUsize::new(0),
            }
        }

        async fn insert(&self, appointment: Appointment) {
            self.appointments
                .write()
                .await
                .insert(appointment.id, appointment);
        }

        async fn matching<F: Fn(&Appointment) -> bool>(&self, filter: F) -> Vec<AppointmentDetails> {
            let mut found: Vec<Appointment> = self
                .appointments
                .read()
                .await
                .values()
                .filter(|a| filter(a))
                .cloned()
                .collect();
            found.sort_by(schedule_order);
            found.into_iter().map(AppointmentDetails::bare).collect()
        }
    }

    #[async_trait]
    impl AppointmentRepository for MockAppointmentRepository {
        async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<AppointmentDetails>> {
            self.find_by_user_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.matching(|a| a.user_id == user_id).await)
        }

        async fn find_by_veterinarian(&self, vet_id: Uuid) -> Result<Vec<AppointmentDetails>> {
            self.find_by_veterinarian_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.matching(|a| a.veterinarian_id == vet_id).await)
        }

        async fn find_by_id_for_role(
            &self,
            id: Uuid,
            actor: &Actor,
        ) -> Result<Option<AppointmentDetails>> {
            self.find_for_role_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .appointments
                .read()
                .await
                .get(&id)
                .filter(|a| a.visible_to(actor))
                .cloned()
                .map(AppointmentDetails::bare))
        }

        async fn find_conflict(&self, slot: &BookingSlot) -> Result<Option<Appointment>> {
            self.find_conflict_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .appointments
                .read()
                .await
                .values()
                .find(|a| slot.is_taken_by(a))
                .cloned())
        }

        async fn create(&self, appointment: &Appointment) -> Result<AppointmentDetails> {
            let mut appointments = self.appointments.write().await;
            if appointments.contains_key(&appointment.id) {
                return Err(RepositoryError::already_exists(
                    "Appointment",
                    appointment.id,
                ));
            }
            appointments.insert(appointment.id, appointment.clone());
            Ok(AppointmentDetails::bare(appointment.clone()))
        }

        async fn update_by_id(
            &self,
            id: Uuid,
            update: &AppointmentUpdate,
        ) -> Result<AppointmentDetails> {
            let mut appointments = self.appointments.write().await;
            let appointment = appointments
                .get_mut(&id)
                .ok_or_else(|| RepositoryError::not_found("Appointment", id))?;
            update.apply(appointment);
            Ok(AppointmentDetails::bare(appointment.clone()))
        }
    }

    fn slot_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 7, 1).unwrap()
    }

    fn slot_time() -> NaiveTime {
        NaiveTime::from_hms_opt(10, 0, 0).unwrap()
    }

    fn booking(user_id: Uuid, vet_id: Uuid) -> Appointment {
        Appointment::new(
            user_id,
            Uuid::new_v4(),
            vet_id,
            slot_date(),
            slot_time(),
            "Annual checkup",
        )
    }

    fn setup() -> (
        Arc<MockAppointmentRepository>,
        Arc<MockCache>,
        CachedAppointmentRepository<MockAppointmentRepository, MockCache>,
    ) {
        let repo = Arc::new(MockAppointmentRepository::new());
        let cache = Arc::new(MockCache::new());
        let cached =
            CachedAppointmentRepository::new(repo.clone(), cache.clone(), Duration::from_secs(30));
        (repo, cache, cached)
    }

    #[tokio::test]
    async fn test_find_by_user_cache_miss_then_hit() {
        let (repo, cache, cached) = setup();
        let user = Uuid::new_v4();
        repo.insert(booking(user, Uuid::new_v4())).await;

        // First call - should hit repository
        let first = cached.find_by_user(user).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(repo.find_by_user_calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains(&appointments_by_user_key(user)).await);

        // Second call - should hit cache
        let second = cached.find_by_user(user).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(repo.find_by_user_calls.load(Ordering::SeqCst), 1); // Still 1
    }

    #[tokio::test]
    async fn test_create_invalidates_user_and_vet_listings() {
        let (repo, _cache, cached) = setup();
        let user = Uuid::new_v4();
        let vet = Uuid::new_v4();

        assert!(cached.find_by_user(user).await.unwrap().is_empty());
        assert!(cached.find_by_veterinarian(vet).await.unwrap().is_empty());

        cached.create(&booking(user, vet)).await.unwrap();

        assert_eq!(cached.find_by_user(user).await.unwrap().len(), 1);
        assert_eq!(cached.find_by_veterinarian(vet).await.unwrap().len(), 1);
        assert_eq!(repo.find_by_user_calls.load(Ordering::SeqCst), 2);
        assert_eq!(repo.find_by_veterinarian_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_leaves_other_users_cached() {
        let (repo, cache, cached) = setup();
        let other = Uuid::new_v4();
        cached.find_by_user(other).await.unwrap();

        cached
            .create(&booking(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();

        assert!(cache.contains(&appointments_by_user_key(other)).await);
        cached.find_by_user(other).await.unwrap();
        assert_eq!(repo.find_by_user_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_find_conflict_is_never_cached() {
        let (repo, cache, cached) = setup();
        let vet = Uuid::new_v4();
        repo.insert(booking(Uuid::new_v4(), vet)).await;
        let slot = BookingSlot::new(vet, slot_date(), slot_time());

        let first = cached.find_conflict(&slot).await.unwrap();
        let second = cached.find_conflict(&slot).await.unwrap();

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(repo.find_conflict_calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.set_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_role_scoped_lookups_use_separate_keys() {
        let (repo, cache, cached) = setup();
        let user = Uuid::new_v4();
        let vet = Uuid::new_v4();
        let appointment = booking(user, vet);
        repo.insert(appointment.clone()).await;

        let as_user = cached
            .find_by_id_for_role(appointment.id, &Actor::user(user))
            .await
            .unwrap();
        let as_stranger = cached
            .find_by_id_for_role(appointment.id, &Actor::user(Uuid::new_v4()))
            .await
            .unwrap();
        cached
            .find_by_id_for_role(appointment.id, &Actor::user(user))
            .await
            .unwrap();

        assert!(as_user.is_some());
        assert!(as_stranger.is_none());
        // Owner lookup cached once; the stranger's miss is not cached.
        assert_eq!(repo.find_for_role_calls.load(Ordering::SeqCst), 2);
        assert!(
            cache
                .contains(&appointment_for_role_key(appointment.id, &Actor::user(user)))
                .await
        );
    }

    #[tokio::test]
    async fn test_update_invalidates_listings_and_role_keys() {
        let (repo, cache, cached) = setup();
        let user = Uuid::new_v4();
        let vet = Uuid::new_v4();
        let appointment = booking(user, vet);
        repo.insert(appointment.clone()).await;

        cached.find_by_user(user).await.unwrap();
        cached.find_by_veterinarian(vet).await.unwrap();
        let actors = [Actor::user(user), Actor::veterinarian(vet), Actor::admin(Uuid::new_v4())];
        for actor in &actors {
            cached
                .find_by_id_for_role(appointment.id, actor)
                .await
                .unwrap();
        }

        let updated = cached
            .update_by_id(
                appointment.id,
                &AppointmentUpdate::status(AppointmentStatus::Confirmed),
            )
            .await
            .unwrap();
        assert_eq!(updated.appointment.status, AppointmentStatus::Confirmed);

        assert!(cache.store.read().await.is_empty());

        let reread = cached
            .find_by_id_for_role(appointment.id, &Actor::veterinarian(vet))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reread.appointment.status, AppointmentStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_failed_update_does_not_touch_cache() {
        let (_repo, cache, cached) = setup();
        let user = Uuid::new_v4();
        cached.find_by_user(user).await.unwrap();
        let sets_before = cache.set_calls.load(Ordering::SeqCst);

        let result = cached
            .update_by_id(
                Uuid::new_v4(),
                &AppointmentUpdate::status(AppointmentStatus::Cancelled),
            )
            .await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert!(cache.contains(&appointments_by_user_key(user)).await);
        assert_eq!(cache.set_calls.load(Ordering::SeqCst), sets_before);
    }
}
