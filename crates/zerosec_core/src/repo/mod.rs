//! Persistence contracts over a durable key-value store.
//!
//! # Responsibility
//! - Define the key-value seam and its SQLite / in-memory implementations.
//! - Own (de)serialization of the archive and settings payloads.
//!
//! # Invariants
//! - Archive and settings use distinct keys.
//! - Write failures surface to the caller; malformed reads degrade to defaults.

pub mod archive_repo;
pub mod kv_repo;
pub mod settings_repo;
