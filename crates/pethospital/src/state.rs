//! Application state: the composition root.
//!
//! Builds the one shared cache, the document store, the cached repository
//! decorators in front of it and the booking workflow on top, and hands them
//! out as trait objects.

use std::sync::Arc;

use chrono::Utc;

use pethospital_core::storage::{
    AppointmentRepository, PetRepository, RepositoryError, UserRepository,
    VeterinarianRepository,
};
use pethospital_core::validation::ValidationChain;

use crate::booking::{availability_chain, BookingService};
use crate::cache::MemoryCache;
use crate::config::Config;
use crate::mock_data::generate_demo_data;
use crate::storage::{
    CachedAppointmentRepository, CachedPetRepository, CachedUserRepository,
    CachedVeterinarianRepository, InMemoryRepository,
};

/// Shared application state.
///
/// Cheap to clone; every clone shares the same cache and store.
#[derive(Clone)]
pub struct AppState {
    /// User repository (cached, wraps the document store).
    pub users: Arc<dyn UserRepository>,
    /// Pet repository (cached, wraps the document store).
    pub pets: Arc<dyn PetRepository>,
    /// Veterinarian repository (cached, wraps the document store).
    pub veterinarians: Arc<dyn VeterinarianRepository>,
    /// Appointment repository (cached, wraps the document store).
    pub appointments: Arc<dyn AppointmentRepository>,
    /// Booking workflow over the cached repositories.
    pub booking: Arc<BookingService>,
    /// Validation for a veterinarian's working hours.
    pub availability: ValidationChain,
    /// The cache every decorator shares.
    pub cache: Arc<MemoryCache>,
}

impl AppState {
    /// Creates AppState with the in-memory store and in-memory cache.
    pub fn new(config: &Config) -> Self {
        let store = Arc::new(InMemoryRepository::new());
        let cache = Arc::new(MemoryCache::new(config.cache_max_entries));

        let users: Arc<dyn UserRepository> = Arc::new(CachedUserRepository::new(
            store.clone(),
            cache.clone(),
            config.entity_ttl(),
        ));
        let pets: Arc<dyn PetRepository> = Arc::new(CachedPetRepository::new(
            store.clone(),
            cache.clone(),
            config.entity_ttl(),
        ));
        let veterinarians: Arc<dyn VeterinarianRepository> =
            Arc::new(CachedVeterinarianRepository::new(
                store.clone(),
                cache.clone(),
                config.entity_ttl(),
            ));
        let appointments: Arc<dyn AppointmentRepository> =
            Arc::new(CachedAppointmentRepository::new(
                store,
                cache.clone(),
                config.appointment_ttl(),
            ));

        let booking = Arc::new(BookingService::new(
            appointments.clone(),
            pets.clone(),
            veterinarians.clone(),
        ));

        tracing::debug!(
            max_entries = config.cache_max_entries,
            appointment_ttl_secs = config.appointment_cache_ttl_seconds,
            entity_ttl_secs = config.entity_cache_ttl_seconds,
            "Application state initialized"
        );

        Self {
            users,
            pets,
            veterinarians,
            appointments,
            booking,
            availability: availability_chain(),
            cache,
        }
    }

    /// Loads the demo hospital through the cached repositories.
    pub async fn with_demo_data(self) -> Result<Self, RepositoryError> {
        let data = generate_demo_data(Utc::now().date_naive());

        for user in &data.users {
            self.users.create(user).await?;
        }
        for vet in &data.veterinarians {
            self.veterinarians.create(vet).await?;
        }
        for pet in &data.pets {
            self.pets.create(pet).await?;
        }
        for appointment in &data.appointments {
            self.appointments.create(appointment).await?;
        }

        tracing::info!(
            users = data.users.len(),
            pets = data.pets.len(),
            veterinarians = data.veterinarians.len(),
            appointments = data.appointments.len(),
            "Demo data loaded"
        );
        Ok(self)
    }
}
