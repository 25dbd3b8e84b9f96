//! Pet hospital booking service.
//!
//! Wires the contracts from `pethospital_core` to concrete adapters: an
//! in-memory TTL cache, an in-memory document store, cached repository
//! decorators and the booking workflow built on top of them.

pub mod booking;
pub mod cache;
pub mod config;
pub mod mock_data;
pub mod state;
pub mod storage;
