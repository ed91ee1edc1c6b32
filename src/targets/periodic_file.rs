//! Periodic file target: one file per time window
//!
//! Entries land in a file named after the current period start
//! (`20260829_140000.txt`) inside a target directory. When the window rolls
//! over the file is closed and a fresh one begins; with a circulation count
//! configured, only the N most recently modified files survive the sweep.
//! A timer rotates idle targets so empty windows still age out old files.

use super::file::LogFile;
use super::periodic::{arm_rotation, period_file_name, sweep_directory, PeriodClock};
use super::Target;
use crate::core::error::{LoggerError, Result};
use crate::core::interval::{Interval, TimeUnit};
use crate::core::log_entry::LogEntry;
use crate::core::scheduler::Scheduler;
use crate::formatters::{DefaultStringConverter, EntryConverter};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::Arc;

pub(crate) struct PeriodicFileState {
    dir: PathBuf,
    circulation_count: usize,
    clock: PeriodClock,
    file: RwLock<Mutex<LogFile>>,
    formatter: Arc<dyn EntryConverter<String>>,
    scheduler: Arc<Scheduler>,
    // Errors raised on the timer thread, surfaced by the next write.
    pending_error: Mutex<Option<LoggerError>>,
}

impl PeriodicFileState {
    fn rotate(&self, now: DateTime<Utc>) -> Result<()> {
        let mut sweep_err = None;
        self.clock.rotate_if_due(now, |rot| {
            let fresh = LogFile::new(self.dir.join(period_file_name(rot.current_start)));
            let old = std::mem::replace(&mut *self.file.write(), Mutex::new(fresh));
            // A never-written LogFile has no file on disk; close is a no-op.
            old.into_inner().close();
            if self.circulation_count >= 2 {
                if let Err(e) = sweep_directory(&self.dir, self.circulation_count) {
                    sweep_err = Some(e);
                }
            }
        });
        match sweep_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn on_timer(state: Arc<Self>) {
        if let Err(e) = state.rotate(Utc::now()) {
            *state.pending_error.lock() = Some(e);
        }
        arm_rotation(
            &state.scheduler,
            &state,
            state.clock.next_period_start(),
            Self::on_timer,
        );
    }
}

pub struct PeriodicFileTarget {
    state: Arc<PeriodicFileState>,
}

impl PeriodicFileTarget {
    pub fn builder(dir: impl Into<PathBuf>, scheduler: Arc<Scheduler>) -> PeriodicFileBuilder {
        PeriodicFileBuilder {
            dir: dir.into(),
            scheduler,
            interval: None,
            circulation_count: 0,
            formatter: None,
        }
    }

    /// Path entries are currently being appended to.
    pub fn current_path(&self) -> PathBuf {
        self.state.file.read().lock().path().to_path_buf()
    }
}

impl Target for PeriodicFileTarget {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        if let Some(e) = self.state.pending_error.lock().take() {
            return Err(e);
        }
        self.state.rotate(Utc::now())?;
        let msg = self.state.formatter.convert(entry);
        // Guard held across the append: rotation's write lock waits for
        // in-flight appends, so no write lands in a swapped-out file.
        let slot = self.state.file.read();
        let result = slot.lock().append(&msg);
        result
    }

    fn flush(&self) -> Result<()> {
        let slot = self.state.file.read();
        let result = slot.lock().flush();
        result
    }

    fn name(&self) -> &str {
        "periodic_file"
    }
}

pub struct PeriodicFileBuilder {
    dir: PathBuf,
    scheduler: Arc<Scheduler>,
    interval: Option<Interval>,
    circulation_count: usize,
    formatter: Option<Arc<dyn EntryConverter<String>>>,
}

impl PeriodicFileBuilder {
    #[must_use]
    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Keep only the `count` most recently modified files in the directory.
    /// Must be at least 2 when set; 0 keeps everything.
    #[must_use]
    pub fn circulation_count(mut self, count: usize) -> Self {
        self.circulation_count = count;
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: Arc<dyn EntryConverter<String>>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn build(self) -> Result<PeriodicFileTarget> {
        if self.circulation_count == 1 {
            return Err(LoggerError::config(
                "periodic_file",
                "circulation count must be at least 2 (or 0 to keep everything)",
            ));
        }
        let interval = match self.interval {
            Some(i) => i,
            None => Interval::new(1, TimeUnit::Day)?,
        };
        let initial = LogFile::new(
            self.dir
                .join(period_file_name(interval.this_period_start())),
        );
        let state = Arc::new(PeriodicFileState {
            dir: self.dir,
            circulation_count: self.circulation_count,
            clock: PeriodClock::new(interval),
            file: RwLock::new(Mutex::new(initial)),
            formatter: self
                .formatter
                .unwrap_or_else(|| Arc::new(DefaultStringConverter::new())),
            scheduler: self.scheduler,
            pending_error: Mutex::new(None),
        });
        arm_rotation(
            &state.scheduler,
            &state,
            state.clock.next_period_start(),
            PeriodicFileState::on_timer,
        );
        Ok(PeriodicFileTarget { state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use tempfile::tempdir;

    fn target(dir: &std::path::Path, interval: Interval) -> PeriodicFileTarget {
        PeriodicFileTarget::builder(dir, Arc::new(Scheduler::new()))
            .interval(interval)
            .build()
            .unwrap()
    }

    #[test]
    fn test_writes_land_in_period_named_file() {
        let dir = tempdir().unwrap();
        let target = target(dir.path(), Interval::new(1, TimeUnit::Day).unwrap());

        target
            .write(&LogEntry::new("app", Level::Info, "hello"))
            .unwrap();
        target.flush().unwrap();

        let path = target.current_path();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with(".txt"));
        assert!(name.len() == "YYYYMMDD_HHMMSS.txt".len());
        assert!(std::fs::read_to_string(&path).unwrap().contains("hello"));
    }

    #[test]
    fn test_empty_window_creates_no_file() {
        let dir = tempdir().unwrap();
        let _target = target(dir.path(), Interval::new(1, TimeUnit::Day).unwrap());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_manual_rotation_moves_to_new_file() {
        let dir = tempdir().unwrap();
        let target = target(dir.path(), Interval::new(1, TimeUnit::Day).unwrap());

        target
            .write(&LogEntry::new("app", Level::Info, "first period"))
            .unwrap();
        let first_path = target.current_path();

        // Force the window forward two days.
        let later = Utc::now() + chrono::Duration::days(2);
        target.state.rotate(later).unwrap();

        assert_ne!(target.current_path(), first_path);
        assert!(first_path.exists());
        assert!(std::fs::read_to_string(&first_path)
            .unwrap()
            .contains("first period"));
    }

    #[test]
    fn test_appends_racing_rotation_are_never_lost() {
        let dir = tempdir().unwrap();
        let target = Arc::new(target(dir.path(), Interval::new(1, TimeUnit::Day).unwrap()));

        let writer = {
            let target = Arc::clone(&target);
            std::thread::spawn(move || {
                for i in 0..200 {
                    target
                        .write(&LogEntry::new("app", Level::Info, format!("entry {}", i)))
                        .unwrap();
                }
            })
        };
        let mut now = Utc::now();
        for _ in 0..25 {
            now = now + chrono::Duration::days(1);
            target.state.rotate(now).unwrap();
        }
        writer.join().unwrap();
        target.flush().unwrap();

        // Every entry landed in one of the period files.
        let mut all = String::new();
        for entry in std::fs::read_dir(dir.path()).unwrap() {
            all.push_str(&std::fs::read_to_string(entry.unwrap().path()).unwrap());
        }
        for i in 0..200 {
            assert!(
                all.contains(&format!("entry {}\n", i)),
                "entry {} was lost",
                i
            );
        }
    }

    #[test]
    fn test_rotation_sweeps_old_files() {
        let dir = tempdir().unwrap();
        let target = PeriodicFileTarget::builder(dir.path(), Arc::new(Scheduler::new()))
            .interval(Interval::new(1, TimeUnit::Hour).unwrap())
            .circulation_count(2)
            .build()
            .unwrap();

        // Seed three stale files with distinct ages.
        for (name, age_hours) in [("a.txt", 40u64), ("b.txt", 30), ("c.txt", 20)] {
            let path = dir.path().join(name);
            std::fs::write(&path, name).unwrap();
            let mtime =
                std::time::SystemTime::now() - std::time::Duration::from_secs(age_hours * 3600);
            std::fs::File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(mtime)
                .unwrap();
        }

        let later = Utc::now() + chrono::Duration::hours(2);
        target.state.rotate(later).unwrap();

        let remaining: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.contains(&"c.txt".to_string()));
        assert!(remaining.contains(&"b.txt".to_string()));
    }

    #[test]
    fn test_circulation_count_of_one_rejected() {
        let dir = tempdir().unwrap();
        let result = PeriodicFileTarget::builder(dir.path(), Arc::new(Scheduler::new()))
            .circulation_count(1)
            .build();
        assert!(result.is_err());
    }
}
