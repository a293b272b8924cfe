//! Durable storage contracts.

pub mod state_store;
