mod time;
mod types;
mod updates;

pub use time::{format_hh_mm, hh_mm, parse_calendar_date, parse_datetime, parse_hh_mm};
pub use types::{
    Actor, Appointment, AppointmentDetails, AppointmentStatus, Pet, PetSummary, User, UserRole,
    UserSummary, Veterinarian, VeterinarianSummary,
};
pub use updates::{AppointmentUpdate, PetUpdate, UserUpdate, VeterinarianUpdate};
