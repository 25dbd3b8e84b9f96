use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use pethospital_core::hospital::{
    Appointment, AppointmentStatus, Pet, User, UserRole, Veterinarian,
};

/// Fixed IDs so demo commands can be typed by hand.
pub const ALICE_ID: Uuid = Uuid::from_u128(0x1000_0000_0000_4000_8000_0000_0000_0001);
pub const BRUNO_ID: Uuid = Uuid::from_u128(0x1000_0000_0000_4000_8000_0000_0000_0002);
pub const ADMIN_ID: Uuid = Uuid::from_u128(0x1000_0000_0000_4000_8000_0000_0000_00ff);
pub const REX_ID: Uuid = Uuid::from_u128(0x2000_0000_0000_4000_8000_0000_0000_0001);
pub const LUNA_ID: Uuid = Uuid::from_u128(0x2000_0000_0000_4000_8000_0000_0000_0002);
pub const PIP_ID: Uuid = Uuid::from_u128(0x2000_0000_0000_4000_8000_0000_0000_0003);
pub const DR_VEGA_ID: Uuid = Uuid::from_u128(0x3000_0000_0000_4000_8000_0000_0000_0001);
pub const DR_OKAFOR_ID: Uuid = Uuid::from_u128(0x3000_0000_0000_4000_8000_0000_0000_0002);
pub const DR_PENDING_ID: Uuid = Uuid::from_u128(0x3000_0000_0000_4000_8000_0000_0000_0003);

/// Seed records for the demo hospital.
#[derive(Debug, Clone, Serialize)]
pub struct DemoData {
    pub users: Vec<User>,
    pub pets: Vec<Pet>,
    pub veterinarians: Vec<Veterinarian>,
    pub appointments: Vec<Appointment>,
}

/// Generates demo records with appointments spread over the days after `today`.
pub fn generate_demo_data(today: NaiveDate) -> DemoData {
    let time = |h: u32, m: u32| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
    let day = |n: i64| today + Duration::days(n);

    let users = vec![
        User::new("Alice Moreau", "alice@example.com")
            .with_id(ALICE_ID)
            .with_phone("+1 555 0101"),
        User::new("Bruno Silva", "bruno@example.com").with_id(BRUNO_ID),
        User::new("Hospital Admin", "admin@example.com")
            .with_id(ADMIN_ID)
            .with_role(UserRole::Admin),
    ];

    let pets = vec![
        Pet::new(ALICE_ID, "Rex", "Dog")
            .with_id(REX_ID)
            .with_breed("Beagle")
            .with_age(4),
        Pet::new(ALICE_ID, "Luna", "Cat").with_id(LUNA_ID).with_age(2),
        Pet::new(BRUNO_ID, "Pip", "Parrot").with_id(PIP_ID),
    ];

    let veterinarians = vec![
        Veterinarian::new("Dr. Elena Vega", "vega@example.com", "Surgery")
            .with_id(DR_VEGA_ID)
            .with_experience(12)
            .approved(),
        Veterinarian::new("Dr. Ade Okafor", "okafor@example.com", "Exotic animals")
            .with_id(DR_OKAFOR_ID)
            .with_experience(6)
            .approved(),
        // Awaiting approval, so it cannot be booked.
        Veterinarian::new("Dr. Sam Reed", "reed@example.com", "Dermatology").with_id(DR_PENDING_ID),
    ];

    let appointments = vec![
        Appointment::new(ALICE_ID, REX_ID, DR_VEGA_ID, day(2), time(9, 30), "Annual vaccination")
            .with_status(AppointmentStatus::Confirmed),
        Appointment::new(ALICE_ID, LUNA_ID, DR_VEGA_ID, day(3), time(14, 0), "Limping on front leg")
            .with_notes("Started after a fall"),
        Appointment::new(BRUNO_ID, PIP_ID, DR_OKAFOR_ID, day(2), time(11, 15), "Beak trim"),
        Appointment::new(BRUNO_ID, PIP_ID, DR_OKAFOR_ID, day(5), time(10, 0), "Follow-up")
            .with_status(AppointmentStatus::Cancelled),
    ];

    DemoData {
        users,
        pets,
        veterinarians,
        appointments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
    }

    #[test]
    fn test_demo_data_references_are_consistent() {
        let data = generate_demo_data(today());

        for pet in &data.pets {
            assert!(data.users.iter().any(|u| u.id == pet.owner_id));
        }
        for appointment in &data.appointments {
            let pet = data.pets.iter().find(|p| p.id == appointment.pet_id).unwrap();
            assert_eq!(pet.owner_id, appointment.user_id);
            assert!(data
                .veterinarians
                .iter()
                .any(|v| v.id == appointment.veterinarian_id && v.is_approved));
            assert!(appointment.date > today());
        }
    }

    #[test]
    fn test_demo_data_is_deterministic() {
        let a = generate_demo_data(today());
        let b = generate_demo_data(today());

        let ids = |d: &DemoData| d.pets.iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(a.appointments.len(), 4);
    }
}
