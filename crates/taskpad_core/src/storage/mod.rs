//! Storage port abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract the task store persists through.
//! - Isolate SQLite details from store/service orchestration.
//!
//! # Invariants
//! - Implementations must treat an absent key as `None`, never as an error.
//! - `set` fully replaces the previous value under the key.

pub mod kv;
