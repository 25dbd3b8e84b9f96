//! Cache backend implementations.
//!
//! Provides the in-process cache behind `pethospital_core::cache::Cache` and
//! the per-key locking the cached repositories use to collapse concurrent
//! misses into a single store read.

mod flight;
mod memory;

pub use flight::SingleFlight;
pub use memory::MemoryCache;
