//! Host-domain contracts shared by the desktop runtime and its browser adapter.
//!
//! This crate owns the durable key/value storage boundary used by session persistence and the
//! wall-clock helper used by the taskbar clock. Concrete browser storage lives in
//! `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod time;

pub use storage::state_store::{
    load_blob_with, save_blob_with, MemoryStateStore, NoopStateStore,
    StateStore, StateStoreFuture,
};
pub use time::local_wall_clock;
