//! Session-scoped stores bridging memory and persisted state.
//!
//! # Responsibility
//! - Own the in-memory projections the UI renders from.
//! - Keep persisted blobs and in-memory state mirroring each other.

pub mod task_store;
