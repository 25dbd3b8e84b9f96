//! In-memory document store.
//!
//! Stores each collection in a HashMap wrapped in `Arc<RwLock<_>>` and
//! implements every repository trait from `pethospital_core::storage` on a
//! single handle, so appointment reads can expand the related user, pet and
//! veterinarian from the same store.
//!
//! # Example
//!
//! ```rust,ignore
//! use pethospital::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! // Use repo for testing...
//! ```

mod repository;

pub use repository::InMemoryRepository;
