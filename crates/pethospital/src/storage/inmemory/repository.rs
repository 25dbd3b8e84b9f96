//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use pethospital_core::hospital::{
    Actor, Appointment, AppointmentDetails, AppointmentUpdate, Pet, PetSummary, PetUpdate, User,
    UserSummary, UserUpdate, Veterinarian, VeterinarianSummary, VeterinarianUpdate,
};
use pethospital_core::storage::{
    newest_first, schedule_order, AppointmentRepository, BookingSlot, PetRepository,
    RepositoryError, Result, UserRepository, VeterinarianRepository,
};

/// In-memory document store.
///
/// Data is not persisted and will be lost when the last handle is dropped.
/// Cloning shares the underlying collections.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    pets: Arc<RwLock<HashMap<Uuid, Pet>>>,
    veterinarians: Arc<RwLock<HashMap<Uuid, Veterinarian>>>,
    appointments: Arc<RwLock<HashMap<Uuid, Appointment>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            pets: Arc::new(RwLock::new(HashMap::new())),
            veterinarians: Arc::new(RwLock::new(HashMap::new())),
            appointments: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Populates the user, pet and veterinarian summaries of `appointment`.
    async fn expand(&self, appointment: Appointment) -> AppointmentDetails {
        let users = self.users.read().await;
        let pets = self.pets.read().await;
        let veterinarians = self.veterinarians.read().await;
        with_summaries(appointment, &users, &pets, &veterinarians)
    }

    /// Expands a batch while holding each collection's read lock once.
    async fn expand_all(&self, appointments: Vec<Appointment>) -> Vec<AppointmentDetails> {
        let users = self.users.read().await;
        let pets = self.pets.read().await;
        let veterinarians = self.veterinarians.read().await;

        appointments
            .into_iter()
            .map(|appointment| with_summaries(appointment, &users, &pets, &veterinarians))
            .collect()
    }

    /// Lists appointments matching `filter` in schedule order, expanded.
    async fn list_appointments<F>(&self, filter: F) -> Vec<AppointmentDetails>
    where
        F: Fn(&Appointment) -> bool,
    {
        let mut matching: Vec<Appointment> = {
            let appointments = self.appointments.read().await;
            appointments.values().filter(|a| filter(a)).cloned().collect()
        };
        matching.sort_by(schedule_order);
        self.expand_all(matching).await
    }
}

fn with_summaries(
    appointment: Appointment,
    users: &HashMap<Uuid, User>,
    pets: &HashMap<Uuid, Pet>,
    veterinarians: &HashMap<Uuid, Veterinarian>,
) -> AppointmentDetails {
    AppointmentDetails {
        user: users.get(&appointment.user_id).map(UserSummary::from),
        pet: pets.get(&appointment.pet_id).map(PetSummary::from),
        veterinarian: veterinarians
            .get(&appointment.veterinarian_id)
            .map(VeterinarianSummary::from),
        appointment,
    }
}

/// Returns true when a user other than `except` already holds `email`.
fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|existing| Some(existing.id) != except && existing.email.eq_ignore_ascii_case(email))
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut listed: Vec<User> = users.values().filter(|u| u.is_listed()).cloned().collect();
        listed.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
        Ok(listed)
    }

    async fn create(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepositoryError::already_exists("User", user.id));
        }
        if email_taken(&users, &user.email, None) {
            return Err(RepositoryError::already_exists("User", &user.email));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_by_id(&self, id: Uuid, update: &UserUpdate) -> Result<User> {
        let mut users = self.users.write().await;
        if let Some(email) = &update.email {
            if users.contains_key(&id) && email_taken(&users, email, Some(id)) {
                return Err(RepositoryError::already_exists("User", email));
            }
        }
        let user = users
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("User", id))?;
        update.apply(user);
        Ok(user.clone())
    }
}

#[async_trait]
impl PetRepository for InMemoryRepository {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Pet>> {
        let pets = self.pets.read().await;
        let mut owned: Vec<Pet> = pets
            .values()
            .filter(|p| p.owner_id == owner_id && p.is_active)
            .cloned()
            .collect();
        owned.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
        Ok(owned)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pet>> {
        let pets = self.pets.read().await;
        Ok(pets.get(&id).cloned())
    }

    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Pet>> {
        let pets = self.pets.read().await;
        Ok(pets
            .get(&id)
            .filter(|p| p.owner_id == owner_id && p.is_active)
            .cloned())
    }

    async fn create(&self, pet: &Pet) -> Result<()> {
        let mut pets = self.pets.write().await;
        if pets.contains_key(&pet.id) {
            return Err(RepositoryError::already_exists("Pet", pet.id));
        }
        pets.insert(pet.id, pet.clone());
        Ok(())
    }

    async fn update_by_id(&self, id: Uuid, update: &PetUpdate) -> Result<Pet> {
        let mut pets = self.pets.write().await;
        let pet = pets
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("Pet", id))?;
        update.apply(pet);
        Ok(pet.clone())
    }
}

#[async_trait]
impl VeterinarianRepository for InMemoryRepository {
    async fn list_approved(&self) -> Result<Vec<Veterinarian>> {
        let veterinarians = self.veterinarians.read().await;
        let mut approved: Vec<Veterinarian> = veterinarians
            .values()
            .filter(|v| v.is_approved && v.is_listed())
            .cloned()
            .collect();
        approved.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
        Ok(approved)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Veterinarian>> {
        let veterinarians = self.veterinarians.read().await;
        Ok(veterinarians.get(&id).cloned())
    }

    async fn create(&self, vet: &Veterinarian) -> Result<()> {
        let mut veterinarians = self.veterinarians.write().await;
        if veterinarians.contains_key(&vet.id) {
            return Err(RepositoryError::already_exists("Veterinarian", vet.id));
        }
        veterinarians.insert(vet.id, vet.clone());
        Ok(())
    }

    async fn update_by_id(&self, id: Uuid, update: &VeterinarianUpdate) -> Result<Veterinarian> {
        let mut veterinarians = self.veterinarians.write().await;
        let vet = veterinarians
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("Veterinarian", id))?;
        update.apply(vet);
        Ok(vet.clone())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<AppointmentDetails>> {
        Ok(self.list_appointments(|a| a.user_id == user_id).await)
    }

    async fn find_by_veterinarian(&self, vet_id: Uuid) -> Result<Vec<AppointmentDetails>> {
        Ok(self
            .list_appointments(|a| a.veterinarian_id == vet_id)
            .await)
    }

    async fn find_by_id_for_role(
        &self,
        id: Uuid,
        actor: &Actor,
    ) -> Result<Option<AppointmentDetails>> {
        let found = {
            let appointments = self.appointments.read().await;
            appointments
                .get(&id)
                .filter(|a| a.visible_to(actor))
                .cloned()
        };
        match found {
            Some(appointment) => Ok(Some(self.expand(appointment).await)),
            None => Ok(None),
        }
    }

    async fn find_conflict(&self, slot: &BookingSlot) -> Result<Option<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(appointments
            .values()
            .find(|a| slot.is_taken_by(a))
            .cloned())
    }

    async fn create(&self, appointment: &Appointment) -> Result<AppointmentDetails> {
        {
            let mut appointments = self.appointments.write().await;
            if appointments.contains_key(&appointment.id) {
                return Err(RepositoryError::already_exists(
                    "Appointment",
                    appointment.id,
                ));
            }
            appointments.insert(appointment.id, appointment.clone());
        }
        Ok(self.expand(appointment.clone()).await)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        update: &AppointmentUpdate,
    ) -> Result<AppointmentDetails> {
        let updated = {
            let mut appointments = self.appointments.write().await;
            let appointment = appointments
                .get_mut(&id)
                .ok_or_else(|| RepositoryError::not_found("Appointment", id))?;
            update.apply(appointment);
            appointment.clone()
        };
        Ok(self.expand(updated).await)
    }
}
