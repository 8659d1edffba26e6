use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Duration {
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Duration {
    /// Parses strings like `1h30m`, `2 days` or a bare number of seconds.
    pub fn parse(string: &str) -> Option<Duration> {
        debug!("Parsing duration: {}", string);
        let string = string.trim().to_lowercase();

        if let Ok(seconds) = string.parse::<i64>() {
            return Some(Duration {
                seconds,
                ..Duration::default()
            });
        }

        lazy_static! {
            static ref DURATION_REGEX: Regex = Regex::new(r"(\d+)\s*(w|d|h|m|s)").unwrap();
        }

        let mut duration = Duration::default();
        let mut matched = false;
        for capture in DURATION_REGEX.captures_iter(&string) {
            let value = capture.get(1)?.as_str().parse::<i64>().ok()?;
            match capture.get(2)?.as_str() {
                "w" => duration.weeks = duration.weeks.saturating_add(value),
                "d" => duration.days = duration.days.saturating_add(value),
                "h" => duration.hours = duration.hours.saturating_add(value),
                "m" => duration.minutes = duration.minutes.saturating_add(value),
                "s" => duration.seconds = duration.seconds.saturating_add(value),
                _ => continue,
            }
            matched = true;
        }

        debug!("Parsed duration: {:?}", duration);
        matched.then_some(duration)
    }

    /// Total length in seconds, or `None` when it does not fit in an `i64`.
    pub fn as_seconds(&self) -> Option<i64> {
        self.seconds
            .checked_add(self.minutes.checked_mul(60)?)?
            .checked_add(self.hours.checked_mul(60 * 60)?)?
            .checked_add(self.days.checked_mul(60 * 60 * 24)?)?
            .checked_add(self.weeks.checked_mul(60 * 60 * 24 * 7)?)
    }
}

/// Countdown text used on giveaway embeds, e.g. `**1** hour, **2** minutes, **3** seconds`.
pub fn format_countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds == 0 {
        return "**0** seconds".to_string();
    }

    let units = [(60 * 60 * 24, "day"), (60 * 60, "hour"), (60, "minute"), (1, "second")];
    let mut remaining = seconds;
    let mut parts = vec![];
    for (size, name) in units {
        let value = remaining / size;
        remaining %= size;
        if value > 0 {
            let plural = if value == 1 { "" } else { "s" };
            parts.push(format!("**{value}** {name}{plural}"));
        }
    }
    parts.join(", ")
}
