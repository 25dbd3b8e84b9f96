//! Cache key builders.
//!
//! Every key has the shape `namespace:operation:arg1:arg2:...` with the
//! arguments in call order, so identical lookups always share a key and
//! lookups that differ in any argument never do.

use std::fmt::Display;

use uuid::Uuid;

use crate::hospital::{Actor, UserRole};

pub const USERS: &str = "users";
pub const PETS: &str = "pets";
pub const VETERINARIANS: &str = "veterinarians";
pub const APPOINTMENTS: &str = "appointments";

const DELIMITER: char = ':';

/// Builds a composite cache key from a namespace, an operation and its arguments.
///
/// # Examples
///
/// ```
/// use pethospital_core::cache::cache_key;
///
/// assert_eq!(cache_key("pets", "findByOwner", &[&42]), "pets:findByOwner:42");
/// assert_eq!(cache_key("veterinarians", "listApproved", &[]), "veterinarians:listApproved");
/// ```
pub fn cache_key(namespace: &str, operation: &str, args: &[&dyn Display]) -> String {
    let mut key = String::with_capacity(namespace.len() + operation.len() + args.len() * 37 + 1);
    key.push_str(namespace);
    key.push(DELIMITER);
    key.push_str(operation);
    for arg in args {
        key.push(DELIMITER);
        key.push_str(&arg.to_string());
    }
    key
}

/// Returns the cache key for a user looked up by ID.
pub fn user_key(user_id: Uuid) -> String {
    cache_key(USERS, "findById", &[&user_id])
}

/// Returns the cache key for a user looked up by email.
///
/// Emails match ignoring ASCII case only, so the key folds ASCII letters and
/// leaves every other character as given.
pub fn user_by_email_key(email: &str) -> String {
    cache_key(USERS, "findByEmail", &[&email.to_ascii_lowercase()])
}

/// Returns the cache key for the active user listing.
pub fn active_users_key() -> String {
    cache_key(USERS, "listActive", &[])
}

/// Returns the cache key for a pet looked up by ID.
pub fn pet_key(pet_id: Uuid) -> String {
    cache_key(PETS, "findById", &[&pet_id])
}

/// Returns the cache key for an owner's active pets.
pub fn pets_by_owner_key(owner_id: Uuid) -> String {
    cache_key(PETS, "findByOwner", &[&owner_id])
}

/// Returns the cache key for an active pet scoped to its owner.
pub fn owned_pet_key(pet_id: Uuid, owner_id: Uuid) -> String {
    cache_key(PETS, "findOwned", &[&pet_id, &owner_id])
}

/// Returns the cache key for a veterinarian looked up by ID.
pub fn veterinarian_key(vet_id: Uuid) -> String {
    cache_key(VETERINARIANS, "findById", &[&vet_id])
}

/// Returns the cache key for the approved veterinarian listing.
pub fn approved_veterinarians_key() -> String {
    cache_key(VETERINARIANS, "listApproved", &[])
}

/// Returns the cache key for a user's appointments.
pub fn appointments_by_user_key(user_id: Uuid) -> String {
    cache_key(APPOINTMENTS, "findByUser", &[&user_id])
}

/// Returns the cache key for a veterinarian's appointments.
pub fn appointments_by_veterinarian_key(vet_id: Uuid) -> String {
    cache_key(APPOINTMENTS, "findByVeterinarian", &[&vet_id])
}

/// Returns the cache key for an appointment looked up on behalf of `actor`.
///
/// Admin scoping does not depend on who the admin is, so admin keys leave the
/// actor ID out and are shared by every admin.
pub fn appointment_for_role_key(appointment_id: Uuid, actor: &Actor) -> String {
    match actor.role {
        UserRole::Admin => cache_key(
            APPOINTMENTS,
            "findByIdForRole",
            &[&appointment_id, &actor.role],
        ),
        UserRole::User | UserRole::Veterinarian => cache_key(
            APPOINTMENTS,
            "findByIdForRole",
            &[&appointment_id, &actor.role, &actor.id],
        ),
    }
}

/// Returns every role-scoped key that can hold the given appointment.
pub fn appointment_for_role_keys(
    appointment_id: Uuid,
    user_id: Uuid,
    veterinarian_id: Uuid,
) -> [String; 3] {
    [
        appointment_for_role_key(appointment_id, &Actor::user(user_id)),
        appointment_for_role_key(appointment_id, &Actor::veterinarian(veterinarian_id)),
        appointment_for_role_key(appointment_id, &Actor::admin(Uuid::nil())),
    ]
}
