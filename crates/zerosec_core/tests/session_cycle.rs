use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use std::cell::Cell;
use zerosec_core::{
    load_settings, Clock, KeyValueStore, ManualClock, SessionController, Settings, SqliteKeyValueStore,
    StoreError, StoreResult, TickOutcome, TimerState,
};

fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 10, 8, 0, 0).unwrap()
}

fn open_session(
    session_seconds: u32,
) -> (
    SessionController<SqliteKeyValueStore, ManualClock>,
    ManualClock,
) {
    let clock = ManualClock::new(start_instant());
    let store = SqliteKeyValueStore::open_in_memory().unwrap();
    let mut session = SessionController::open(store, clock.clone());
    session.apply_settings(Settings {
        session_seconds,
        daily_goal: 1,
    });
    (session, clock)
}

/// Ticks once per simulated second until something other than a count happens.
fn run_until_cycle<S: KeyValueStore>(
    session: &mut SessionController<S, ManualClock>,
    clock: &ManualClock,
) -> StoreResult<TickOutcome> {
    loop {
        clock.advance(Duration::seconds(1));
        match session.tick()? {
            TickOutcome::Counted { .. } => continue,
            other => return Ok(other),
        }
    }
}

#[test]
fn expiry_archives_written_memo_and_restarts() {
    let (mut session, clock) = open_session(30);

    session.focus_title();
    session.edit_title("A");
    let started = session.started_at().unwrap();
    assert_eq!(started, start_instant());

    clock.advance(Duration::seconds(3));
    session.focus_bullet();
    let first = session.draft().bullets.first_id();
    session.update_bullet(first, "b1");
    session.blur_field();

    let outcome = run_until_cycle(&mut session, &clock).unwrap();
    let TickOutcome::Cycled(cycle) = outcome else {
        panic!("expected a cycle, got {outcome:?}");
    };

    assert_eq!(session.records().len(), 1);
    let memo = &session.records()[0];
    assert_eq!(Some(memo.id), cycle.archived);
    assert_eq!(memo.title, "A");
    assert_eq!(memo.bullets, vec!["b1".to_string()]);
    assert_eq!(memo.created_at, started);
    assert_eq!(memo.completed_at, Some(clock.now()));
    assert!(memo.completed_at.unwrap() >= memo.created_at);

    assert_eq!(session.draft().title, "");
    assert_eq!(session.draft().bullets.len(), 1);
    assert!(session.draft().is_blank());
    assert_eq!(session.timer().state(), TimerState::Idle);
    assert_eq!(session.timer().remaining_seconds(), 30);
    assert!(session.started_at().is_none());

    let utc = FixedOffset::east_opt(0).unwrap();
    let history = session.history_in(utc);
    let today = start_instant().date_naive();
    assert!(history.days_with_records().contains(&today));
    assert_eq!(history.bucket_on(today).today.len(), 1);
    assert!(history.day_record(today, session.settings().daily_goal).completed);
}

#[test]
fn local_history_follows_controller_clock() {
    let (mut session, clock) = open_session(30);

    session.edit_title("A");
    assert!(session.skip().unwrap().archived.is_some());

    let history = session.history();
    assert_eq!(history.today(), clock.now().with_timezone(&chrono::Local).date_naive());
    assert_eq!(history.bucket().today.len(), 1);
    let progress = session.today_progress();
    assert_eq!(progress.memo_count, 1);
    assert!(progress.completed);

    clock.advance(Duration::days(2));
    let buckets = session.history().bucket();
    assert!(buckets.today.is_empty());
    assert!(buckets.yesterday.is_empty());
    assert_eq!(buckets.older.len(), 1);
    assert_eq!(session.today_progress().memo_count, 0);
    assert!(!session.today_progress().completed);
}

#[test]
fn blank_session_elapses_without_archiving() {
    let (mut session, clock) = open_session(30);

    session.focus_title();
    session.edit_title("   ");
    session.blur_field();

    let outcome = run_until_cycle(&mut session, &clock).unwrap();
    assert_eq!(
        outcome,
        TickOutcome::Cycled(zerosec_core::CycleOutcome { archived: None })
    );
    assert!(session.records().is_empty());
    assert!(session.draft().is_blank());
    assert!(session.timer().is_fresh());
}

#[test]
fn skip_archives_immediately_with_filtered_bullets() {
    let (mut session, clock) = open_session(60);

    session.edit_title("");
    let first = session.draft().bullets.first_id();
    session.update_bullet(first, "keep");
    let blank = session.insert_bullet().unwrap();
    session.update_bullet(blank, "  ");
    let last = session.insert_bullet().unwrap();
    session.update_bullet(last, "also");

    clock.advance(Duration::seconds(12));
    let cycle = session.skip().unwrap();

    let memo = &session.records()[0];
    assert_eq!(cycle.archived, Some(memo.id));
    assert_eq!(memo.bullets, vec!["keep".to_string(), "also".to_string()]);
    assert_eq!(memo.created_at, start_instant());
    assert_eq!(
        memo.completed_at,
        Some(start_instant() + Duration::seconds(12))
    );
}

#[test]
fn start_stamp_survives_pause_and_resume() {
    let (mut session, clock) = open_session(10);

    session.edit_title("paused");
    clock.advance(Duration::seconds(2));
    session.tick().unwrap();
    assert!(session.stop());

    clock.advance(Duration::minutes(5));
    assert!(session.start());
    let outcome = run_until_cycle(&mut session, &clock).unwrap();
    assert!(matches!(outcome, TickOutcome::Cycled(_)));
    assert_eq!(session.records()[0].created_at, start_instant());
}

#[test]
fn unstarted_draft_is_not_archived_on_skip() {
    let (mut session, _clock) = open_session(10);
    let first = session.draft().bullets.first_id();
    session.update_bullet(first, "never started");

    let cycle = session.skip().unwrap();
    assert_eq!(cycle.archived, None);
    assert!(session.records().is_empty());
    assert!(session.draft().is_blank());
}

#[test]
fn reset_on_fresh_timer_is_not_observable() {
    let (mut session, _clock) = open_session(30);
    let before = session.timer().clone();
    session.reset();
    assert_eq!(session.timer(), &before);
}

#[test]
fn records_persist_across_controller_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.db");
    let clock = ManualClock::new(start_instant());

    {
        let store = SqliteKeyValueStore::open(&path).unwrap();
        let mut session = SessionController::open(store, clock.clone());
        for title in ["one", "two", "three"] {
            session.edit_title(title);
            clock.advance(Duration::seconds(5));
            session.skip().unwrap();
        }
    }

    let store = SqliteKeyValueStore::open(&path).unwrap();
    let session = SessionController::open(store, clock);
    let titles: Vec<&str> = session
        .records()
        .iter()
        .map(|memo| memo.title.as_str())
        .collect();
    assert_eq!(titles, vec!["three", "two", "one"]);
}

#[test]
fn saved_settings_reload_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");
    let clock = ManualClock::new(start_instant());

    {
        let store = SqliteKeyValueStore::open(&path).unwrap();
        let mut session = SessionController::open(store, clock.clone());
        let saved = session
            .save_settings(Settings::from_raw("45", "three"))
            .unwrap();
        assert_eq!(saved.session_seconds, 45);
        assert_eq!(saved.daily_goal, Settings::default().daily_goal);
        assert_eq!(session.timer().remaining_seconds(), 45);
    }

    let store = SqliteKeyValueStore::open(&path).unwrap();
    assert_eq!(load_settings(&store).unwrap().session_seconds, 45);
    let session = SessionController::open(store, clock);
    assert_eq!(session.timer().duration_seconds(), 45);
}

/// Reads succeed (empty) and writes fail on demand.
#[derive(Default)]
struct FlakyStore {
    fail_writes: Cell<bool>,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable("disk full".to_string()));
        }
        Ok(())
    }
}

#[test]
fn write_failure_surfaces_but_keeps_record_and_restarts() {
    let store = FlakyStore::default();
    let clock = ManualClock::new(start_instant());
    let mut session = SessionController::open(&store, clock);

    store.fail_writes.set(true);
    session.edit_title("unsaved");
    let err = session.skip().unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));

    assert_eq!(session.records().len(), 1);
    assert_eq!(session.records()[0].title, "unsaved");
    assert!(session.draft().is_blank());
    assert!(session.timer().is_fresh());
    assert!(session.started_at().is_none());

    store.fail_writes.set(false);
    session.edit_title("saved");
    assert!(session.skip().unwrap().archived.is_some());
    assert_eq!(session.records().len(), 2);
}
