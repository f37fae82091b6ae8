//! # warden-store
//!
//! File-backed keyed document store. One JSON file holds every collection;
//! each operation is a full read-modify-write serialized behind an async
//! mutex, so interleaved writers in one process can never lose an update.

mod communities;
mod error;
mod json_store;

pub use communities::{CommunityPatch, CommunityStore};
pub use error::{StoreError, StoreResult};
pub use json_store::JsonStore;
