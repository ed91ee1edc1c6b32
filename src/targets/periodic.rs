//! Shared machinery for time-bucketed targets
//!
//! A periodic target owns a `PeriodClock` and a swappable resource. Appends
//! take a read lock on the resource slot; rotation holds the clock lock for
//! the whole swap, so a write racing a timer-driven rotation either lands in
//! the old period's resource or the new one, never in a torn state.

use crate::core::error::{LoggerError, Result};
use crate::core::interval::Interval;
use crate::core::scheduler::Scheduler;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

/// The window transition produced by a rotation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rotation {
    pub previous_start: DateTime<Utc>,
    pub current_start: DateTime<Utc>,
}

/// Serializes period advancement across the consumer thread and the timer.
pub(crate) struct PeriodClock {
    interval: Mutex<Interval>,
}

impl PeriodClock {
    pub fn new(interval: Interval) -> Self {
        Self {
            interval: Mutex::new(interval),
        }
    }

    pub fn this_period_start(&self) -> DateTime<Utc> {
        self.interval.lock().this_period_start()
    }

    pub fn next_period_start(&self) -> DateTime<Utc> {
        self.interval.lock().next_period_start()
    }

    /// Advance the window if `now` crossed a boundary, running `on_rotate`
    /// under the clock lock. Idempotent: a second caller for the same
    /// boundary sees an up-to-date window and does nothing.
    pub fn rotate_if_due<F>(&self, now: DateTime<Utc>, on_rotate: F) -> bool
    where
        F: FnOnce(Rotation),
    {
        let mut interval = self.interval.lock();
        if !interval.elapsed(now) {
            return false;
        }
        let previous_start = interval.this_period_start();
        interval.update(now);
        on_rotate(Rotation {
            previous_start,
            current_start: interval.this_period_start(),
        });
        true
    }
}

/// Instant corresponding to a wall-clock deadline, clamped to "now" for
/// deadlines already in the past.
pub(crate) fn instant_at(when: DateTime<Utc>) -> Instant {
    let delta = (when - Utc::now()).to_std().unwrap_or(Duration::ZERO);
    Instant::now() + delta
}

/// Arm a one-shot timer holding only a `Weak` to the target state. A dropped
/// target silently cancels its pending rotation.
pub(crate) fn arm_rotation<S>(
    scheduler: &Arc<Scheduler>,
    state: &Arc<S>,
    when: DateTime<Utc>,
    on_fire: fn(Arc<S>),
) where
    S: Send + Sync + 'static,
{
    let weak: Weak<S> = Arc::downgrade(state);
    scheduler.schedule(instant_at(when), move || {
        if let Some(state) = weak.upgrade() {
            on_fire(state);
        }
    });
}

/// File name for the period starting at `start`, e.g. `20260829_140000.txt`.
pub(crate) fn period_file_name(start: DateTime<Utc>) -> String {
    format!("{}.txt", start.format("%Y%m%d_%H%M%S"))
}

/// Delete all but the `keep` most recently modified files in `dir`.
/// Returns how many files were removed. `keep == 0` disables the sweep.
pub(crate) fn sweep_directory(dir: &Path, keep: usize) -> Result<usize> {
    if keep == 0 {
        return Ok(0);
    }

    let mut files: Vec<(PathBuf, std::time::SystemTime)> = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| {
        LoggerError::io_operation(format!("listing log directory '{}'", dir.display()), e)
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| {
            LoggerError::io_operation(format!("listing log directory '{}'", dir.display()), e)
        })?;
        let meta = match entry.metadata() {
            Ok(m) if m.is_file() => m,
            _ => continue,
        };
        let modified = meta.modified().unwrap_or(std::time::UNIX_EPOCH);
        files.push((entry.path(), modified));
    }

    // Newest first; everything past the retention window goes.
    files.sort_by(|a, b| b.1.cmp(&a.1));
    let mut removed = 0;
    for (path, _) in files.into_iter().skip(keep) {
        fs::remove_file(&path).map_err(|e| {
            LoggerError::io_operation(format!("removing old log file '{}'", path.display()), e)
        })?;
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interval::TimeUnit;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn test_rotate_if_due_fires_once_per_boundary() {
        let clock =
            PeriodClock::new(Interval::new_at(60, TimeUnit::Second, at(0)).unwrap());

        let mut rotations = 0;
        assert!(clock.rotate_if_due(at(61), |_| rotations += 1));
        assert!(!clock.rotate_if_due(at(61), |_| rotations += 1));
        assert!(!clock.rotate_if_due(at(119), |_| rotations += 1));
        assert_eq!(rotations, 1);
        assert_eq!(clock.this_period_start(), at(60));
    }

    #[test]
    fn test_rotation_reports_both_windows() {
        let clock =
            PeriodClock::new(Interval::new_at(60, TimeUnit::Second, at(0)).unwrap());
        clock.rotate_if_due(at(185), |rot| {
            assert_eq!(rot.previous_start, at(0));
            assert_eq!(rot.current_start, at(180));
        });
    }

    #[test]
    fn test_period_file_name_format() {
        let start = Utc.with_ymd_and_hms(2026, 8, 29, 14, 30, 0).single().unwrap();
        assert_eq!(period_file_name(start), "20260829_143000.txt");
    }

    #[test]
    fn test_sweep_keeps_newest() {
        let dir = tempdir().unwrap();
        for (name, age) in [("old.txt", 3u64), ("mid.txt", 2), ("new.txt", 1)] {
            let path = dir.path().join(name);
            fs::write(&path, name).unwrap();
            let mtime = std::time::SystemTime::now() - Duration::from_secs(age * 3600);
            let file = fs::File::options().write(true).open(&path).unwrap();
            file.set_modified(mtime).unwrap();
        }

        let removed = sweep_directory(dir.path(), 2).unwrap();
        assert_eq!(removed, 1);
        assert!(!dir.path().join("old.txt").exists());
        assert!(dir.path().join("mid.txt").exists());
        assert!(dir.path().join("new.txt").exists());
    }

    #[test]
    fn test_sweep_zero_is_disabled() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        assert_eq!(sweep_directory(dir.path(), 0).unwrap(), 0);
        assert!(dir.path().join("a.txt").exists());
    }
}
