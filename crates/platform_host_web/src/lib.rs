//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! The only durable service the desktop shell needs is blob storage, backed here by
//! `window.localStorage`. Host strategy selection lives in [`adapters`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod storage;

pub use adapters::{host_strategy_name, selected_host_strategy, state_store, HostStrategy};
pub use storage::local_storage::WebStateStore;
