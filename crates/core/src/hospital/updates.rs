use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Appointment, AppointmentStatus, Pet, User, Veterinarian};

/// Partial update for a user. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
    pub is_blocked: Option<bool>,
}

impl UserUpdate {
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        if let Some(is_blocked) = self.is_blocked {
            user.is_blocked = is_blocked;
        }
    }
}

/// Partial update for a pet. Setting `is_active` to false is a soft delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetUpdate {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub is_active: Option<bool>,
}

impl PetUpdate {
    /// Shorthand for a soft delete.
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Self::default()
        }
    }

    pub fn apply(&self, pet: &mut Pet) {
        if let Some(name) = &self.name {
            pet.name = name.clone();
        }
        if let Some(species) = &self.species {
            pet.species = species.clone();
        }
        if let Some(breed) = &self.breed {
            pet.breed = Some(breed.clone());
        }
        if let Some(age) = self.age {
            pet.age = Some(age);
        }
        if let Some(is_active) = self.is_active {
            pet.is_active = is_active;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VeterinarianUpdate {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub experience_years: Option<u32>,
    pub is_approved: Option<bool>,
    pub is_active: Option<bool>,
    pub is_blocked: Option<bool>,
}

impl VeterinarianUpdate {
    pub fn approve() -> Self {
        Self {
            is_approved: Some(true),
            ..Self::default()
        }
    }

    pub fn apply(&self, vet: &mut Veterinarian) {
        if let Some(name) = &self.name {
            vet.name = name.clone();
        }
        if let Some(specialization) = &self.specialization {
            vet.specialization = specialization.clone();
        }
        if let Some(years) = self.experience_years {
            vet.experience_years = years;
        }
        if let Some(is_approved) = self.is_approved {
            vet.is_approved = is_approved;
        }
        if let Some(is_active) = self.is_active {
            vet.is_active = is_active;
        }
        if let Some(is_blocked) = self.is_blocked {
            vet.is_blocked = is_blocked;
        }
    }
}

/// Partial update for an appointment: reschedule, status change or notes.
///
/// The owning user, pet and veterinarian are fixed at booking time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentUpdate {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

impl AppointmentUpdate {
    pub fn reschedule(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date: Some(date),
            time: Some(time),
            ..Self::default()
        }
    }

    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Applies the changes and bumps `updated_at`.
    pub fn apply(&self, appointment: &mut Appointment) {
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(time) = self.time {
            appointment.time = time;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(notes) = &self.notes {
            appointment.notes = Some(notes.clone());
        }
        appointment.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_user_update_only_touches_set_fields() {
        let mut user = User::new("Ana", "ana@example.com").with_phone("555-0100");
        UserUpdate {
            email: Some("ana@vet.example".to_string()),
            ..UserUpdate::default()
        }
        .apply(&mut user);

        assert_eq!(user.email, "ana@vet.example");
        assert_eq!(user.name, "Ana");
        assert_eq!(user.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_pet_deactivate_is_soft_delete() {
        let mut pet = Pet::new(Uuid::new_v4(), "Rex", "Dog");
        PetUpdate::deactivate().apply(&mut pet);
        assert!(!pet.is_active);
        assert_eq!(pet.name, "Rex");
    }

    #[test]
    fn test_veterinarian_approve() {
        let mut vet = Veterinarian::new("Dr. Vega", "vega@example.com", "Surgery");
        VeterinarianUpdate::approve().apply(&mut vet);
        assert!(vet.is_approved);
    }

    #[test]
    fn test_appointment_reschedule_bumps_updated_at() {
        let date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let created = chrono::DateTime::from_timestamp(0, 0).unwrap();
        let mut appointment = Appointment::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            date,
            time,
            "Checkup",
        )
        .with_created_at(created);

        let new_date = NaiveDate::from_ymd_opt(2030, 1, 2).unwrap();
        let new_time = NaiveTime::from_hms_opt(14, 15, 0).unwrap();
        AppointmentUpdate::reschedule(new_date, new_time).apply(&mut appointment);

        assert_eq!(appointment.date, new_date);
        assert_eq!(appointment.time, new_time);
        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert!(appointment.updated_at > created);
    }
}
