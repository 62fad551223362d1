//! Session controller: draft + countdown + archive.
//!
//! # Responsibility
//! - Apply editing events to the current draft.
//! - Start sessions implicitly on first title interaction.
//! - Archive-and-restart when the countdown expires or the user skips.
//! - Present archived memos read-only without losing the session in progress.
//!
//! # Invariants
//! - A tick advances the countdown only while `running && !typing` in
//!   editing mode.
//! - Expiry is handled inside the tick that reaches zero; no further tick can
//!   observe an expired timer.
//! - A cycle always resets draft, timer and start stamp, even when nothing was
//!   archived or persistence failed.
//! - `created_at` of an archived memo is the session start stamp, never the
//!   expiry time.
//! - Logs carry ids and counts only, never memo text.

use crate::clock::Clock;
use crate::model::bullet::BulletId;
use crate::model::draft::MemoDraft;
use crate::model::memo::{ArchivedMemo, MemoId};
use crate::model::settings::Settings;
use crate::model::timer::{SessionTimer, TimerTick};
use crate::repo::archive_repo::ArchiveStore;
use crate::repo::kv_repo::{KeyValueStore, StoreResult};
use crate::repo::settings_repo;
use crate::service::history_service::{DayRecord, HistoryIndex};
use chrono::{DateTime, Local, TimeZone, Utc};
use log::{error, info};

/// Whether the draft surface is editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Editing,
    /// Read-only presentation of one archived memo.
    Viewing(MemoId),
}

/// Result of one archive-and-restart cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Id of the memo appended to the archive, if any.
    pub archived: Option<MemoId>,
}

/// Result of delivering one tick to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, typing, or read-only; nothing changed.
    Suppressed,
    Counted { remaining: u32 },
    /// Countdown reached zero and a new session began.
    Cycled(CycleOutcome),
}

/// Editing session parked while the viewer is open.
#[derive(Debug, Clone)]
struct StashedSession {
    draft: MemoDraft,
    started_at: Option<DateTime<Utc>>,
    remaining_seconds: u32,
}

/// One explicit session context; no process-global state.
pub struct SessionController<S: KeyValueStore, C: Clock> {
    draft: MemoDraft,
    timer: SessionTimer,
    archive: ArchiveStore<S>,
    settings: Settings,
    clock: C,
    started_at: Option<DateTime<Utc>>,
    typing: bool,
    mode: SessionMode,
    stashed: Option<StashedSession>,
}

impl<S: KeyValueStore, C: Clock> SessionController<S, C> {
    /// Hydrates settings and archive from `store`.
    ///
    /// Read failures degrade to defaults / an empty archive.
    pub fn open(store: S, clock: C) -> Self {
        let settings = settings_repo::load_settings(&store).unwrap_or_else(|err| {
            error!(
                "event=settings_load module=service status=error error_code=store_read_failed error={}",
                err
            );
            Settings::default()
        });
        let archive = ArchiveStore::open(store);

        Self {
            draft: MemoDraft::new(),
            timer: SessionTimer::new(settings.session_seconds),
            archive,
            settings,
            clock,
            started_at: None,
            typing: false,
            mode: SessionMode::Editing,
            stashed: None,
        }
    }

    pub fn draft(&self) -> &MemoDraft {
        &self.draft
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn archive(&self) -> &ArchiveStore<S> {
        &self.archive
    }

    pub fn records(&self) -> &[ArchivedMemo] {
        self.archive.records()
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Start stamp of the current session, if one began.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.mode, SessionMode::Viewing(_))
    }

    /// History in the process's local time zone, "today" taken from the clock.
    pub fn history(&self) -> HistoryIndex<'_, Local> {
        HistoryIndex::local(self.archive.records(), self.clock.now())
    }

    pub fn history_in<Tz: TimeZone>(&self, tz: Tz) -> HistoryIndex<'_, Tz> {
        HistoryIndex::new(self.archive.records(), tz, self.clock.now())
    }

    /// Today's count against the configured goal, in local time.
    pub fn today_progress(&self) -> DayRecord {
        let history = self.history();
        history.day_record(history.today(), self.settings.daily_goal)
    }

    // ---- field events ----

    /// Title field gained focus; may start the session.
    pub fn focus_title(&mut self) {
        if self.is_read_only() {
            return;
        }
        self.typing = true;
        self.start_implicitly();
    }

    pub fn focus_bullet(&mut self) {
        if self.is_read_only() {
            return;
        }
        self.typing = true;
    }

    pub fn blur_field(&mut self) {
        self.typing = false;
    }

    /// Replaces the title; may start the session.
    pub fn edit_title(&mut self, text: impl Into<String>) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.draft.title = text.into();
        self.start_implicitly();
        true
    }

    pub fn insert_bullet(&mut self) -> Option<BulletId> {
        if self.is_read_only() {
            return None;
        }
        Some(self.draft.bullets.insert())
    }

    pub fn update_bullet(&mut self, id: BulletId, text: impl Into<String>) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.draft.bullets.update(id, text)
    }

    pub fn remove_bullet(&mut self, id: BulletId) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.draft.bullets.remove(id)
    }

    /// Enter on the title: next focus target, if the title is filled in.
    pub fn commit_title(&self) -> Option<BulletId> {
        if self.is_read_only() || self.draft.has_blank_title() {
            return None;
        }
        Some(self.draft.bullets.first_id())
    }

    /// Enter on a bullet: next focus target, appending a row after the last.
    ///
    /// Blank rows do not advance.
    pub fn commit_bullet(&mut self, id: BulletId) -> Option<BulletId> {
        if self.is_read_only() {
            return None;
        }
        let bullet = self.draft.bullets.get(id)?;
        if bullet.is_blank() {
            return None;
        }
        match self.draft.bullets.next_id(id) {
            Some(next) => Some(next),
            None => Some(self.draft.bullets.insert()),
        }
    }

    /// Clears the draft without archiving; timer and start stamp stay.
    pub fn reset_draft(&mut self) {
        if self.is_read_only() {
            return;
        }
        self.draft.clear();
        info!("event=draft_reset module=service status=ok");
    }

    // ---- timer commands ----

    /// Starts or resumes the countdown. Stamps the session if unstamped.
    pub fn start(&mut self) -> bool {
        if self.is_read_only() || !self.timer.start() {
            return false;
        }
        self.stamp_start();
        true
    }

    /// Pauses the countdown; remaining time and start stamp are kept.
    pub fn stop(&mut self) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.timer.stop()
    }

    /// Reloads the countdown to full duration, idle.
    pub fn reset(&mut self) {
        if self.is_read_only() {
            return;
        }
        self.timer.reset();
    }

    /// Delivers one one-second tick.
    ///
    /// # Errors
    /// - Returns the archive write failure of an expiry cycle. The new
    ///   session has already begun when the error is returned.
    pub fn tick(&mut self) -> StoreResult<TickOutcome> {
        if self.is_read_only() || self.typing || !self.timer.is_running() {
            return Ok(TickOutcome::Suppressed);
        }

        match self.timer.tick() {
            TimerTick::Ignored => Ok(TickOutcome::Suppressed),
            TimerTick::Counted(remaining) => Ok(TickOutcome::Counted { remaining }),
            TimerTick::Expired => self.cycle("expired").map(TickOutcome::Cycled),
        }
    }

    /// Archives now and starts a new session, as if the countdown expired.
    ///
    /// # Errors
    /// - Same as [`Self::tick`].
    pub fn skip(&mut self) -> StoreResult<CycleOutcome> {
        if self.is_read_only() {
            return Ok(CycleOutcome { archived: None });
        }
        self.cycle("skipped")
    }

    // ---- viewer ----

    /// Shows an archived memo read-only. Returns `false` for unknown ids.
    ///
    /// The editing session in progress is parked with its remaining time and
    /// start stamp; the visible countdown shows the full duration, idle.
    pub fn view_archived(&mut self, id: MemoId) -> bool {
        let Some(record) = self.archive.get(id) else {
            return false;
        };
        let draft = MemoDraft::from_archived(record);

        if self.mode == SessionMode::Editing {
            self.timer.stop();
            self.stashed = Some(StashedSession {
                draft: std::mem::take(&mut self.draft),
                started_at: self.started_at.take(),
                remaining_seconds: self.timer.remaining_seconds(),
            });
        }

        self.draft = draft;
        self.timer.reset();
        self.typing = false;
        self.mode = SessionMode::Viewing(id);
        info!("event=session_view module=service status=ok memo_id={id}");
        true
    }

    /// Leaves the viewer and restores the parked session, paused.
    pub fn return_to_editing(&mut self) -> bool {
        if !self.is_read_only() {
            return false;
        }
        self.mode = SessionMode::Editing;
        match self.stashed.take() {
            Some(stashed) => {
                self.draft = stashed.draft;
                self.started_at = stashed.started_at;
                self.timer =
                    SessionTimer::paused(self.settings.session_seconds, stashed.remaining_seconds);
            }
            None => self.clear_session(),
        }
        true
    }

    /// Drops any viewer or parked session and starts from a blank draft.
    pub fn begin_new_session(&mut self) {
        self.mode = SessionMode::Editing;
        self.stashed = None;
        self.clear_session();
        info!("event=session_reset module=service status=ok reason=new_session");
    }

    // ---- settings ----

    /// Applies settings in memory only.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings.coerce();
        self.timer.set_duration(self.settings.session_seconds);
    }

    /// Applies settings and persists them.
    ///
    /// # Errors
    /// - Returns the write failure; the settings still apply in memory.
    pub fn save_settings(&mut self, settings: Settings) -> StoreResult<Settings> {
        self.apply_settings(settings);
        settings_repo::save_settings(self.archive.store(), self.settings)
    }

    // ---- internals ----

    fn start_implicitly(&mut self) {
        if self.timer.is_fresh() && self.timer.start() {
            self.stamp_start();
        }
    }

    fn stamp_start(&mut self) {
        if self.started_at.is_some() {
            return;
        }
        self.started_at = Some(self.clock.now());
        info!(
            "event=session_start module=service status=ok duration_s={} remaining_s={}",
            self.timer.duration_seconds(),
            self.timer.remaining_seconds()
        );
    }

    fn cycle(&mut self, reason: &str) -> StoreResult<CycleOutcome> {
        let completed_at = self.clock.now();
        let snapshot = self
            .started_at
            .and_then(|created_at| ArchivedMemo::snapshot(&self.draft, created_at, completed_at));

        let result = match snapshot {
            Some(memo) => {
                let memo_id = memo.id;
                let bullet_count = memo.bullets.len();
                self.archive.append(memo).map(|()| {
                    info!(
                        "event=session_archive module=service status=ok reason={reason} memo_id={memo_id} bullets={bullet_count}"
                    );
                    Some(memo_id)
                })
            }
            None => {
                info!(
                    "event=session_discard module=service status=ok reason={reason} blank={} started={}",
                    self.draft.is_blank(),
                    self.started_at.is_some()
                );
                Ok(None)
            }
        };

        self.clear_session();
        result.map(|archived| CycleOutcome { archived })
    }

    fn clear_session(&mut self) {
        self.draft.clear();
        self.timer.reset();
        self.started_at = None;
    }
}
