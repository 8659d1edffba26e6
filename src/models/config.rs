use std::env;

use tracing::warn;

pub const DEFAULT_TICK_MS: u64 = 1000;
pub const DEFAULT_LOOKAHEAD_MS: i64 = 1900;
pub const DEFAULT_CLOSING_WINDOW_SECS: i64 = 6;
pub const DEFAULT_PARTICIPANT_LIMIT: u8 = 100;

pub const MAX_TICK_MS: u64 = 60_000;
pub const MAX_LOOKAHEAD_MS: i64 = 60_000;
pub const MAX_CLOSING_WINDOW_SECS: i64 = 60 * 60;

pub const TADA: &str = "\u{1F389}";

/// Tuning for the giveaway updater loop.
///
/// `lookahead` decides how early a giveaway is finalized. `closing_window` decides when its
/// countdown turns red and starts refreshing every tick.
#[derive(Clone, Debug)]
pub struct UpdaterConfig {
    pub tick: std::time::Duration,
    pub lookahead: time::Duration,
    pub closing_window: time::Duration,
    pub participant_limit: u8,
    pub emoji: String,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        UpdaterConfig {
            tick: std::time::Duration::from_millis(DEFAULT_TICK_MS),
            lookahead: time::Duration::milliseconds(DEFAULT_LOOKAHEAD_MS),
            closing_window: time::Duration::seconds(DEFAULT_CLOSING_WINDOW_SECS),
            participant_limit: DEFAULT_PARTICIPANT_LIMIT,
            emoji: TADA.to_string(),
        }
    }
}

impl UpdaterConfig {
    pub fn from_env() -> Self {
        UpdaterConfig::from_values(
            env_number("GIVEAWAY_TICK_MS", DEFAULT_TICK_MS),
            env_number("GIVEAWAY_LOOKAHEAD_MS", DEFAULT_LOOKAHEAD_MS),
            env_number("GIVEAWAY_CLOSING_WINDOW_SECS", DEFAULT_CLOSING_WINDOW_SECS),
            env_number("GIVEAWAY_PARTICIPANT_LIMIT", DEFAULT_PARTICIPANT_LIMIT),
        )
    }

    /// Builds a config from raw numbers, clamping each into the range the updater can use.
    pub fn from_values(
        tick_ms: u64,
        lookahead_ms: i64,
        closing_window_secs: i64,
        participant_limit: u8,
    ) -> Self {
        UpdaterConfig {
            tick: std::time::Duration::from_millis(clamped("tick", tick_ms, 1, MAX_TICK_MS)),
            lookahead: time::Duration::milliseconds(clamped(
                "lookahead",
                lookahead_ms,
                0,
                MAX_LOOKAHEAD_MS,
            )),
            closing_window: time::Duration::seconds(clamped(
                "closing window",
                closing_window_secs,
                0,
                MAX_CLOSING_WINDOW_SECS,
            )),
            participant_limit: clamped(
                "participant limit",
                participant_limit,
                1,
                DEFAULT_PARTICIPANT_LIMIT,
            ),
            emoji: TADA.to_string(),
        }
    }
}

fn clamped<T: Ord + Copy + std::fmt::Display>(name: &str, value: T, min: T, max: T) -> T {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!("Updater {name} {value} is out of range, using {clamped}");
    }
    clamped
}

fn env_number<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Ignoring invalid value {value:?} for {name}, using {default}");
                default
            }
        },
        Err(_) => default,
    }
}
