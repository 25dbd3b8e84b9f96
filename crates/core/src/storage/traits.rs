use async_trait::async_trait;
use uuid::Uuid;

use crate::hospital::{
    Actor, Appointment, AppointmentDetails, AppointmentUpdate, Pet, PetUpdate, User, UserUpdate,
    Veterinarian, VeterinarianUpdate,
};

use super::{BookingSlot, Result};

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID, regardless of status flags.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by email address (case-insensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Lists active, unblocked users, newest first.
    async fn list_active(&self) -> Result<Vec<User>>;

    /// Creates a new user.
    async fn create(&self, user: &User) -> Result<()>;

    /// Applies a partial update and returns the stored result.
    async fn update_by_id(&self, id: Uuid, update: &UserUpdate) -> Result<User>;
}

/// Repository for pet records.
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Lists an owner's active pets, newest first.
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Pet>>;

    /// Gets a pet by its ID, including soft-deleted pets.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pet>>;

    /// Gets a pet only if it is active and belongs to `owner_id`.
    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Pet>>;

    /// Creates a new pet.
    async fn create(&self, pet: &Pet) -> Result<()>;

    /// Applies a partial update and returns the stored result.
    async fn update_by_id(&self, id: Uuid, update: &PetUpdate) -> Result<Pet>;
}

/// Repository for veterinarian profiles.
#[async_trait]
pub trait VeterinarianRepository: Send + Sync {
    /// Lists approved, active, unblocked veterinarians, newest first.
    async fn list_approved(&self) -> Result<Vec<Veterinarian>>;

    /// Gets a veterinarian by ID, regardless of approval.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Veterinarian>>;

    /// Creates a new veterinarian profile.
    async fn create(&self, vet: &Veterinarian) -> Result<()>;

    /// Applies a partial update and returns the stored result.
    async fn update_by_id(&self, id: Uuid, update: &VeterinarianUpdate) -> Result<Veterinarian>;
}

/// Repository for appointments.
///
/// Listing and lookup operations return records with the related user, pet
/// and veterinarian expanded.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Lists a user's appointments, latest slot first.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<AppointmentDetails>>;

    /// Lists a veterinarian's appointments, latest slot first.
    async fn find_by_veterinarian(&self, vet_id: Uuid) -> Result<Vec<AppointmentDetails>>;

    /// Gets an appointment if `actor` is allowed to see it.
    ///
    /// Users see their own bookings, veterinarians the ones assigned to them,
    /// admins everything. An appointment outside the actor's scope is `None`.
    async fn find_by_id_for_role(
        &self,
        id: Uuid,
        actor: &Actor,
    ) -> Result<Option<AppointmentDetails>>;

    /// Finds a live booking occupying `slot`. `Ok(None)` means the slot is free.
    async fn find_conflict(&self, slot: &BookingSlot) -> Result<Option<Appointment>>;

    /// Creates a new appointment and returns it expanded.
    async fn create(&self, appointment: &Appointment) -> Result<AppointmentDetails>;

    /// Applies a partial update and returns the stored result expanded.
    async fn update_by_id(
        &self,
        id: Uuid,
        update: &AppointmentUpdate,
    ) -> Result<AppointmentDetails>;
}
