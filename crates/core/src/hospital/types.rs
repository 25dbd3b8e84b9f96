use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::hh_mm;

/// Account role, used for scoping what a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Veterinarian,
    Admin,
}

impl UserRole {
    /// Returns the lowercase name used in cache keys and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Veterinarian => "veterinarian",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The caller on whose behalf a repository query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn user(id: Uuid) -> Self {
        Self {
            id,
            role: UserRole::User,
        }
    }

    pub fn veterinarian(id: Uuid) -> Self {
        Self {
            id,
            role: UserRole::Veterinarian,
        }
    }

    pub fn admin(id: Uuid) -> Self {
        Self {
            id,
            role: UserRole::Admin,
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active pet owner account.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            phone: None,
            role: UserRole::User,
            is_active: true,
            is_blocked: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets a specific ID for this user (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Visible in default listings: active and not blocked.
    pub fn is_listed(&self) -> bool {
        self.is_active && !self.is_blocked
    }
}

/// A pet owned by a user. Removal is a soft delete via `is_active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Pet {
    pub fn new(owner_id: Uuid, name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            species: species.into(),
            breed: None,
            age: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Sets a specific ID for this pet (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// A veterinarian profile. Only approved profiles can take bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Veterinarian {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub experience_years: u32,
    pub is_approved: bool,
    pub is_active: bool,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl Veterinarian {
    /// Creates a new veterinarian awaiting approval.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        specialization: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            specialization: specialization.into(),
            experience_years: 0,
            is_approved: false,
            is_active: true,
            is_blocked: false,
            created_at: Utc::now(),
        }
    }

    pub fn approved(mut self) -> Self {
        self.is_approved = true;
        self
    }

    pub fn with_experience(mut self, years: u32) -> Self {
        self.experience_years = years;
        self
    }

    /// Sets a specific ID for this veterinarian (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Visible in default listings: approved, active and not blocked.
    pub fn is_listed(&self) -> bool {
        self.is_approved && self.is_active && !self.is_blocked
    }
}

/// Lifecycle of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Rejected,
}

impl AppointmentStatus {
    /// Cancelled and rejected appointments no longer hold their slot.
    pub fn releases_slot(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Cancelled | AppointmentStatus::Rejected
        )
    }

    /// No further status changes are allowed from a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed
                | AppointmentStatus::Cancelled
                | AppointmentStatus::Rejected
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    /// Parses a status name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(AppointmentStatus::Pending),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            "REJECTED" => Ok(AppointmentStatus::Rejected),
            _ => Err(format!("unknown appointment status: {s}")),
        }
    }
}

/// A booked visit for a pet with a veterinarian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub veterinarian_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub time: NaiveTime,
    pub reason: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Creates a new pending appointment.
    pub fn new(
        user_id: Uuid,
        pet_id: Uuid,
        veterinarian_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        reason: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            pet_id,
            veterinarian_id,
            date,
            time,
            reason: reason.into(),
            status: AppointmentStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Sets a specific ID for this appointment (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Returns true when `actor` is allowed to see this appointment.
    pub fn visible_to(&self, actor: &Actor) -> bool {
        match actor.role {
            UserRole::User => self.user_id == actor.id,
            UserRole::Veterinarian => self.veterinarian_id == actor.id,
            UserRole::Admin => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetSummary {
    pub id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
}

impl From<&Pet> for PetSummary {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id,
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VeterinarianSummary {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
}

impl From<&Veterinarian> for VeterinarianSummary {
    fn from(vet: &Veterinarian) -> Self {
        Self {
            id: vet.id,
            name: vet.name.clone(),
            specialization: vet.specialization.clone(),
        }
    }
}

/// An appointment with its related documents expanded.
///
/// A summary is `None` when the referenced document no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub user: Option<UserSummary>,
    pub pet: Option<PetSummary>,
    pub veterinarian: Option<VeterinarianSummary>,
}

impl AppointmentDetails {
    /// Wraps an appointment without any expanded relations.
    pub fn bare(appointment: Appointment) -> Self {
        Self {
            appointment,
            user: None,
            pet: None,
            veterinarian: None,
        }
    }
}
