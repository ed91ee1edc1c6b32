//! Aligned time windows for periodic targets
//!
//! Period boundaries are computed from a fixed epoch, not from construction
//! time, so two targets with the same duration configured at different times
//! land on the same boundaries.

use super::error::LoggerError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

/// Units of time a period duration can be expressed in.
///
/// Fixed second counts only; no calendar-aware month/year units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
}

impl TimeUnit {
    pub fn as_secs(&self) -> i64 {
        match self {
            TimeUnit::Second => 1,
            TimeUnit::Minute => 60,
            TimeUnit::Hour => 3600,
            TimeUnit::Day => 86_400,
            TimeUnit::Week => 7 * 86_400,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "second" | "seconds" | "sec" | "s" => Ok(TimeUnit::Second),
            "minute" | "minutes" | "min" | "m" => Ok(TimeUnit::Minute),
            "hour" | "hours" | "h" => Ok(TimeUnit::Hour),
            "day" | "days" | "d" => Ok(TimeUnit::Day),
            "week" | "weeks" | "w" => Ok(TimeUnit::Week),
            _ => Err(format!("Invalid time unit: '{}'", s)),
        }
    }
}

/// Alignment epoch for period boundaries. Any fixed instant works; period N
/// begins at `EPOCH + N * duration`.
fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).single().expect("unix epoch is valid")
}

/// A fixed-duration window aligned to the epoch.
///
/// Invariant after any update: `this_period_start <= now < next_period_start`
/// and `next_period_start == this_period_start + duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    duration: Duration,
    this_period_start: DateTime<Utc>,
}

impl Interval {
    /// Create an interval of `count` × `unit`, aligned as of `now`.
    pub fn new(count: u32, unit: TimeUnit) -> Result<Self, LoggerError> {
        Self::new_at(count, unit, Utc::now())
    }

    /// As `new`, with an explicit current time. Used by tests and by targets
    /// restoring state.
    pub fn new_at(count: u32, unit: TimeUnit, now: DateTime<Utc>) -> Result<Self, LoggerError> {
        if count == 0 {
            return Err(LoggerError::config("interval", "count must be a positive integer"));
        }
        let duration = Duration::seconds(unit.as_secs() * i64::from(count));
        Ok(Self {
            duration,
            this_period_start: last_boundary(duration, now),
        })
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn this_period_start(&self) -> DateTime<Utc> {
        self.this_period_start
    }

    pub fn next_period_start(&self) -> DateTime<Utc> {
        self.this_period_start + self.duration
    }

    /// Whether `now` has crossed into a later period.
    pub fn elapsed(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_period_start()
    }

    /// Advance the window until it contains `now`. Loops in case several
    /// periods passed while idle (suspended process, long gap between
    /// entries). Returns true if the window moved.
    pub fn update(&mut self, now: DateTime<Utc>) -> bool {
        let mut advanced = false;
        while now >= self.next_period_start() {
            self.this_period_start = self.next_period_start();
            advanced = true;
        }
        advanced
    }
}

fn last_boundary(duration: Duration, now: DateTime<Utc>) -> DateTime<Utc> {
    let dur_secs = duration.num_seconds();
    let elapsed = (now - epoch()).num_seconds();
    let periods_passed = elapsed.div_euclid(dur_secs);
    epoch() + Duration::seconds(dur_secs * periods_passed)
}

fn interval_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<count>\d+)\s*(?P<unit>[a-zA-Z]+)$").expect("valid regex"))
}

impl FromStr for Interval {
    type Err = LoggerError;

    /// Parse strings like `"3 day"` or `"15min"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = interval_regex()
            .captures(s.trim())
            .ok_or_else(|| LoggerError::IntervalParse(s.to_string()))?;
        let count: u32 = caps["count"]
            .parse()
            .map_err(|_| LoggerError::IntervalParse(s.to_string()))?;
        let unit: TimeUnit = caps["unit"]
            .parse()
            .map_err(|_| LoggerError::IntervalParse(s.to_string()))?;
        Interval::new(count, unit)
    }
}
