mod error;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use traits::{AppointmentRepository, PetRepository, UserRepository, VeterinarianRepository};
pub use types::{newest_first, schedule_order, BookingSlot};
