//! Settings persistence.
//!
//! # Invariants
//! - Settings live under their own key, separate from the archive.
//! - Loaded settings are always coerced; bad stored values never escape.

use crate::model::settings::Settings;
use crate::repo::kv_repo::{KeyValueStore, StoreResult};
use log::{info, warn};

/// Storage key of the serialized settings.
pub const SETTINGS_KEY: &str = "zerosec.settings";

/// Reads settings, falling back to defaults when absent or malformed.
///
/// # Errors
/// - Returns backend read failures only.
pub fn load_settings<S: KeyValueStore>(store: &S) -> StoreResult<Settings> {
    let Some(raw) = store.get(SETTINGS_KEY)? else {
        info!("event=settings_load module=repo status=ok source=default");
        return Ok(Settings::default());
    };

    match serde_json::from_str::<Settings>(&raw) {
        Ok(settings) => {
            let coerced = settings.coerce();
            info!(
                "event=settings_load module=repo status=ok source=store session_seconds={} daily_goal={} coerced={}",
                coerced.session_seconds,
                coerced.daily_goal,
                coerced != settings
            );
            Ok(coerced)
        }
        Err(err) => {
            warn!(
                "event=settings_load module=repo status=degraded error_code=malformed_settings error={}",
                err
            );
            Ok(Settings::default())
        }
    }
}

/// Coerces and persists settings, returning what was stored.
pub fn save_settings<S: KeyValueStore>(store: &S, settings: Settings) -> StoreResult<Settings> {
    let coerced = settings.coerce();
    let payload = serde_json::to_string(&coerced)?;
    store.set(SETTINGS_KEY, &payload)?;
    info!(
        "event=settings_save module=repo status=ok session_seconds={} daily_goal={}",
        coerced.session_seconds, coerced.daily_goal
    );
    Ok(coerced)
}
