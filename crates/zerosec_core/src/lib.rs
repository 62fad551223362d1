//! Core domain logic for zero-second-thinking memo sessions.
//! This crate is the single source of truth for session invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::bullet::{Bullet, BulletId, BulletList};
pub use model::draft::MemoDraft;
pub use model::memo::{ArchivedMemo, MemoId, MemoValidationError};
pub use model::settings::Settings;
pub use model::timer::{SessionTimer, TimerState, TimerTick};
pub use repo::archive_repo::{ArchiveStore, ARCHIVE_KEY};
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use repo::settings_repo::{load_settings, save_settings, SETTINGS_KEY};
pub use service::history_service::{Buckets, DayRecord, HistoryIndex};
pub use service::session_service::{CycleOutcome, SessionController, SessionMode, TickOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
