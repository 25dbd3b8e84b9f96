//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `pethospital_core::storage`:
//!
//! - [`inmemory`]: the document store every base repository runs against
//! - [`cached`]: decorators that put the shared cache in front of any of them

pub mod cached;
pub mod inmemory;

pub use cached::{
    CachedAppointmentRepository, CachedPetRepository, CachedUserRepository,
    CachedVeterinarianRepository,
};
pub use inmemory::InMemoryRepository;
