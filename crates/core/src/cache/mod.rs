mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    appointment_for_role_key, appointment_for_role_keys, appointments_by_user_key,
    appointments_by_veterinarian_key, approved_veterinarians_key, cache_key, active_users_key,
    owned_pet_key, pet_key, pets_by_owner_key, user_by_email_key, user_key, veterinarian_key,
    APPOINTMENTS, PETS, USERS, VETERINARIANS,
};
pub use serialization::{deserialize_value, serialize_value, SerializationError};
pub use traits::Cache;
