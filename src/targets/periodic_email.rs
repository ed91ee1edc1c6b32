//! Periodic email target: one message per time window
//!
//! Accepted entries are spooled to a temp file. At each period boundary the
//! spool is swapped out under the clock lock, emailed if it holds anything,
//! and deleted. Windows with no entries send nothing.

use super::email::{EmailMessage, EmailTransport};
use super::file::LogFile;
use super::periodic::{arm_rotation, PeriodClock, Rotation};
use super::Target;
use crate::core::error::{LoggerError, Result};
use crate::core::interval::{Interval, TimeUnit};
use crate::core::log_entry::LogEntry;
use crate::core::scheduler::Scheduler;
use crate::formatters::{DefaultStringConverter, EntryConverter};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use uuid::Uuid;

fn spool_file() -> LogFile {
    let path = std::env::temp_dir().join(format!("tidelog-{}.spool", Uuid::new_v4()));
    LogFile::new(path).delete_on_close(true)
}

pub(crate) struct PeriodicEmailState {
    transport: Arc<dyn EmailTransport>,
    from: Option<String>,
    to: String,
    subject: Option<String>,
    clock: PeriodClock,
    spool: RwLock<Mutex<LogFile>>,
    formatter: Arc<dyn EntryConverter<String>>,
    scheduler: Arc<Scheduler>,
    pending_error: Mutex<Option<LoggerError>>,
}

impl PeriodicEmailState {
    fn subject_for(&self, rotation: Rotation) -> String {
        self.subject.clone().unwrap_or_else(|| {
            format!(
                "Log entries for period starting {}",
                rotation.previous_start.format("%Y-%m-%d %H:%M:%S UTC")
            )
        })
    }

    fn rotate(&self, now: DateTime<Utc>) -> Result<()> {
        let mut send_err = None;
        self.clock.rotate_if_due(now, |rotation| {
            let old = std::mem::replace(&mut *self.spool.write(), Mutex::new(spool_file()));
            let mut old = old.into_inner();
            let _ = old.flush();
            if !old.is_empty() {
                match old.read_to_string() {
                    Ok(body) => {
                        let message = EmailMessage {
                            from: self.from.clone(),
                            to: self.to.clone(),
                            subject: self.subject_for(rotation),
                            body,
                        };
                        if let Err(e) = self.transport.send(&message) {
                            send_err = Some(e);
                        }
                    }
                    Err(e) => send_err = Some(e),
                }
            }
            // Spool is transient; close deletes it.
            old.close();
        });
        match send_err {
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

pub struct PeriodicEmailTarget {
    state: Arc<PeriodicEmailState>,
}

impl PeriodicEmailTarget {
    pub fn builder(
        transport: Arc<dyn EmailTransport>,
        to: impl Into<String>,
        scheduler: Arc<Scheduler>,
    ) -> PeriodicEmailBuilder {
        PeriodicEmailBuilder {
            transport,
            to: to.into(),
            from: None,
            subject: None,
            scheduler,
            interval: None,
            formatter: None,
        }
    }
}

impl Target for PeriodicEmailTarget {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        if let Some(e) = self.state.pending_error.lock().take() {
            return Err(e);
        }
        self.state.rotate(Utc::now())?;
        let msg = self.state.formatter.convert(entry);
        // Guard held across the append: rotation's write lock waits for
        // in-flight appends, so no write lands in a deleted spool.
        let slot = self.state.spool.read();
        let result = slot.lock().append(&msg);
        result
    }

    fn flush(&self) -> Result<()> {
        let slot = self.state.spool.read();
        let result = slot.lock().flush();
        result
    }

    fn name(&self) -> &str {
        "periodic_email"
    }
}

pub struct PeriodicEmailBuilder {
    transport: Arc<dyn EmailTransport>,
    to: String,
    from: Option<String>,
    subject: Option<String>,
    scheduler: Arc<Scheduler>,
    interval: Option<Interval>,
    formatter: Option<Arc<dyn EntryConverter<String>>>,
}

impl PeriodicEmailBuilder {
    #[must_use]
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Fixed subject; the default names the period the message covers.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: Arc<dyn EntryConverter<String>>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn build(self) -> Result<PeriodicEmailTarget> {
        let interval = match self.interval {
            Some(i) => i,
            None => Interval::new(1, TimeUnit::Day)?,
        };
        let state = Arc::new(PeriodicEmailState {
            transport: self.transport,
            from: self.from,
            to: self.to,
            subject: self.subject,
            clock: PeriodClock::new(interval),
            spool: RwLock::new(Mutex::new(spool_file())),
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
            PeriodicEmailState::on_timer,
        );
        Ok(PeriodicEmailTarget { state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::targets::email::test_support::RecordingTransport;

    fn target(
        transport: Arc<RecordingTransport>,
        interval: Interval,
    ) -> PeriodicEmailTarget {
        PeriodicEmailTarget::builder(transport, "ops@example.com", Arc::new(Scheduler::new()))
            .from("logger@example.com")
            .interval(interval)
            .build()
            .unwrap()
    }

    #[test]
    fn test_entries_batch_into_one_message() {
        let transport = RecordingTransport::new();
        let target = target(transport.clone(), Interval::new(1, TimeUnit::Day).unwrap());

        target
            .write(&LogEntry::new("app", Level::Warn, "first"))
            .unwrap();
        target
            .write(&LogEntry::new("app", Level::Error, "second"))
            .unwrap();
        assert!(transport.sent().is_empty());

        let later = Utc::now() + chrono::Duration::days(1);
        target.state.rotate(later).unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("first"));
        assert!(sent[0].body.contains("second"));
        assert_eq!(sent[0].to, "ops@example.com");
    }

    #[test]
    fn test_empty_window_sends_nothing() {
        let transport = RecordingTransport::new();
        let target = target(transport.clone(), Interval::new(1, TimeUnit::Day).unwrap());

        let later = Utc::now() + chrono::Duration::days(1);
        target.state.rotate(later).unwrap();
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_spool_deleted_after_rotation() {
        let transport = RecordingTransport::new();
        let target = target(transport.clone(), Interval::new(1, TimeUnit::Day).unwrap());

        target
            .write(&LogEntry::new("app", Level::Info, "spooled"))
            .unwrap();
        let spool_path = target.state.spool.read().lock().path().to_path_buf();
        assert!(spool_path.exists());

        let later = Utc::now() + chrono::Duration::days(1);
        target.state.rotate(later).unwrap();
        assert!(!spool_path.exists());
    }

    #[test]
    fn test_default_subject_names_period() {
        let transport = RecordingTransport::new();
        let target = target(transport.clone(), Interval::new(1, TimeUnit::Day).unwrap());

        target
            .write(&LogEntry::new("app", Level::Info, "x"))
            .unwrap();
        let later = Utc::now() + chrono::Duration::days(1);
        target.state.rotate(later).unwrap();

        assert!(transport.sent()[0]
            .subject
            .starts_with("Log entries for period starting "));
    }

    #[test]
    fn test_appends_racing_rotation_are_never_lost() {
        let transport = RecordingTransport::new();
        let target = Arc::new(target(
            transport.clone(),
            Interval::new(1, TimeUnit::Day).unwrap(),
        ));

        // Writer appends while this thread rotates; every entry must end up
        // in exactly one sent message, never in a deleted spool.
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
        now = now + chrono::Duration::days(1);
        target.state.rotate(now).unwrap();

        let bodies: String = transport
            .sent()
            .iter()
            .map(|m| m.body.as_str())
            .collect();
        for i in 0..200 {
            assert!(
                bodies.contains(&format!("entry {}\n", i)),
                "entry {} was lost",
                i
            );
        }
    }

    #[test]
    fn test_entries_after_rotation_go_to_next_message() {
        let transport = RecordingTransport::new();
        let target = target(transport.clone(), Interval::new(1, TimeUnit::Day).unwrap());

        target
            .write(&LogEntry::new("app", Level::Info, "window one"))
            .unwrap();
        target.state.rotate(Utc::now() + chrono::Duration::days(1)).unwrap();
        target
            .write(&LogEntry::new("app", Level::Info, "window two"))
            .unwrap();
        target.state.rotate(Utc::now() + chrono::Duration::days(2)).unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].body.contains("window one"));
        assert!(!sent[0].body.contains("window two"));
        assert!(sent[1].body.contains("window two"));
    }
}
