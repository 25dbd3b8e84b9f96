//! Functional core for the pet hospital booking service.
//!
//! Everything in this crate is free of I/O: domain types, the cache and
//! repository contracts, cache key builders, and the request validation
//! chain. Concrete adapters live in the `pethospital` crate.

pub mod cache;
pub mod hospital;
pub mod storage;
pub mod validation;
