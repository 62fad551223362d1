//! Domain model for timed memo sessions.
//!
//! # Responsibility
//! - Define the pure values the session controller orchestrates.
//! - Keep model types free of storage and clock access.
//!
//! # Invariants
//! - Bullets and archived memos are identified by stable UUIDs.
//! - Archived memos are immutable once built.

pub mod bullet;
pub mod draft;
pub mod memo;
pub mod settings;
pub mod timer;
