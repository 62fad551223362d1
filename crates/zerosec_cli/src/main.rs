//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `zerosec_core` linkage with a deterministic ping.
//! - Optionally summarize the history stored in a database file.
//!
//! Usage: `zerosec_cli [DB_PATH]`. Set `ZEROSEC_LOG_DIR` (absolute) to
//! enable file logging.

use std::process::ExitCode;
use zerosec_core::{
    default_log_level, init_logging, SessionController, SqliteKeyValueStore, SystemClock,
};

const SUMMARY_CHARS: usize = 40;
const RECENT_DAYS: usize = 7;

fn main() -> ExitCode {
    println!("zerosec_core ping={}", zerosec_core::ping());
    println!("zerosec_core version={}", zerosec_core::core_version());

    if let Ok(log_dir) = std::env::var("ZEROSEC_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let store = match SqliteKeyValueStore::open(&db_path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let session = SessionController::open(store, SystemClock);
    let settings = session.settings();
    let history = session.history();
    let buckets = history.bucket();

    println!(
        "settings session_seconds={} daily_goal={}",
        settings.session_seconds, settings.daily_goal
    );
    println!(
        "history total={} today={} yesterday={} older={}",
        buckets.total(),
        buckets.today.len(),
        buckets.yesterday.len(),
        buckets.older.len()
    );
    for day in history.day_records(settings.daily_goal).iter().take(RECENT_DAYS) {
        println!(
            "day {} memos={} goal_met={}",
            day.date, day.memo_count, day.completed
        );
    }
    for memo in &buckets.today {
        println!(
            "today {} {}",
            memo.created_at
                .with_timezone(&chrono::Local)
                .format("%H:%M"),
            memo.summary(SUMMARY_CHARS)
        );
    }

    ExitCode::SUCCESS
}
