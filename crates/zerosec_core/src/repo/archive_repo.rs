//! Archive of completed memos.
//!
//! # Responsibility
//! - Hold every `ArchivedMemo`, newest first.
//! - Persist the full collection under one key on every append.
//! - Re-hydrate the collection at startup.
//!
//! # Invariants
//! - Records are only ever prepended; none is mutated or removed.
//! - After a successful `append` the durable copy equals the in-memory copy.
//! - Malformed persisted data hydrates as an empty collection.
//! - A failed startup read never lets a later append overwrite the durable
//!   copy: the archive re-reads and merges before its first write.

use crate::model::memo::{ArchivedMemo, MemoId};
use crate::repo::kv_repo::{KeyValueStore, StoreResult};
use log::{error, info, warn};
use std::time::Instant;

/// Storage key of the serialized archive.
pub const ARCHIVE_KEY: &str = "zerosec.memos";

/// Reads the persisted archive.
///
/// # Errors
/// - Returns backend read failures.
/// - Malformed JSON or invalid records are not errors: they are logged and
///   an empty collection is returned.
pub fn load_all<S: KeyValueStore>(store: &S) -> StoreResult<Vec<ArchivedMemo>> {
    let Some(raw) = store.get(ARCHIVE_KEY)? else {
        info!("event=archive_load module=repo status=ok source=empty count=0");
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<ArchivedMemo>>(&raw) {
        Ok(records) => {
            info!(
                "event=archive_load module=repo status=ok source=store count={}",
                records.len()
            );
            Ok(records)
        }
        Err(err) => {
            warn!(
                "event=archive_load module=repo status=degraded error_code=malformed_archive line={} column={}",
                err.line(),
                err.column()
            );
            Ok(Vec::new())
        }
    }
}

/// Newest-first, write-through archive over a key-value store.
pub struct ArchiveStore<S: KeyValueStore> {
    store: S,
    records: Vec<ArchivedMemo>,
    /// `false` while the durable collection could not be read.
    hydrated: bool,
}

impl<S: KeyValueStore> ArchiveStore<S> {
    /// Hydrates from `store`, degrading to an empty in-memory archive on
    /// read failure.
    pub fn open(store: S) -> Self {
        let (records, hydrated) = match load_all(&store) {
            Ok(records) => (records, true),
            Err(err) => {
                error!(
                    "event=archive_load module=repo status=error error_code=store_read_failed error={}",
                    err
                );
                (Vec::new(), false)
            }
        };
        Self {
            store,
            records,
            hydrated,
        }
    }

    /// Prepends one record and persists the whole collection.
    ///
    /// When the startup read failed, the durable collection is read again
    /// first and merged behind the in-memory records.
    ///
    /// # Errors
    /// - Returns validation, serialization or backend write failures.
    ///   On a write failure the record stays in memory, so the in-memory
    ///   view is ahead of the durable one until the next successful append.
    /// - Returns the read failure while the durable collection is still
    ///   unreadable; nothing is written and the record stays in memory.
    pub fn append(&mut self, record: ArchivedMemo) -> StoreResult<()> {
        record.validate()?;
        let started_at = Instant::now();
        self.records.insert(0, record);

        if !self.hydrated {
            self.rehydrate()?;
        }

        match self.persist() {
            Ok(()) => {
                info!(
                    "event=archive_append module=repo status=ok count={} duration_ms={}",
                    self.records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=archive_append module=repo status=error error_code=persist_failed count={} error={}",
                    self.records.len(),
                    err
                );
                Err(err)
            }
        }
    }

    fn rehydrate(&mut self) -> StoreResult<()> {
        match load_all(&self.store) {
            Ok(durable) => {
                // Records appended while degraded are newer than anything durable.
                self.records.extend(durable);
                self.hydrated = true;
                info!(
                    "event=archive_load module=repo status=ok source=rehydrate count={}",
                    self.records.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=archive_append module=repo status=error error_code=store_unreadable pending={} error={}",
                    self.records.len(),
                    err
                );
                Err(err)
            }
        }
    }

    fn persist(&self) -> StoreResult<()> {
        let payload = serde_json::to_string(&self.records)?;
        self.store.set(ARCHIVE_KEY, &payload)
    }

    /// All records, newest first.
    pub fn records(&self) -> &[ArchivedMemo] {
        &self.records
    }

    pub fn get(&self, id: MemoId) -> Option<&ArchivedMemo> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the durable collection has been read successfully.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
