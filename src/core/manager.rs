//! Log manager: the asynchronous dispatch core
//!
//! Producers hand entries to an unbounded queue; a single background consumer
//! walks the configured targets in order for each entry. One consumer means
//! every target observes entries in submission order. A failing target never
//! stops the pipeline; failures go to the injected fault sink.

use super::error::LoggerError;
use super::log_entry::LogEntry;
use super::logger::Logger;
use super::scheduler::Scheduler;
use crate::formatters::FormatterRegistry;
use crate::targets::ConfiguredTarget;
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

/// Callback invoked with every failure the core recovers from (target write
/// errors, target panics, submissions after close). With no sink attached,
/// failures are dropped: logging problems must never reach application
/// control flow.
pub type FaultSink = Arc<dyn Fn(&LoggerError) + Send + Sync>;

pub(crate) struct ManagerShared {
    targets: RwLock<Vec<ConfiguredTarget>>,
    formatters: FormatterRegistry,
    sender: RwLock<Option<Sender<LogEntry>>>,
    fault_sink: Option<FaultSink>,
}

impl ManagerShared {
    pub(crate) fn submit(&self, entry: LogEntry) {
        let sender = self.sender.read();
        match sender.as_ref() {
            Some(tx) => {
                if tx.send(entry).is_err() {
                    self.report(&LoggerError::QueueClosed);
                }
            }
            None => self.report(&LoggerError::QueueClosed),
        }
    }

    fn report(&self, fault: &LoggerError) {
        if let Some(sink) = &self.fault_sink {
            sink(fault);
        }
    }

    /// Dispatch one entry to every matching target, in configured order.
    ///
    /// Write failures and panics are captured per target and reported; a
    /// matching final target ends the pass whether or not its write
    /// succeeded.
    fn dispatch(&self, entry: &LogEntry) {
        let targets = self.targets.read();
        for target in targets.iter() {
            if !target.should_write(entry) {
                continue;
            }

            match catch_unwind(AssertUnwindSafe(|| target.target().write(entry))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.report(&LoggerError::target_write(target.name(), e.to_string()));
                }
                Err(panic_info) => {
                    self.report(&LoggerError::target_panic(
                        target.name(),
                        panic_message(&panic_info),
                    ));
                }
            }

            if target.is_final() {
                break;
            }
        }
    }

    fn flush_all(&self) {
        let targets = self.targets.read();
        for target in targets.iter() {
            match catch_unwind(AssertUnwindSafe(|| target.target().flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.report(&LoggerError::target_write(target.name(), e.to_string()));
                }
                Err(panic_info) => {
                    self.report(&LoggerError::target_panic(
                        target.name(),
                        panic_message(&panic_info),
                    ));
                }
            }
        }
    }
}

fn panic_message(panic_info: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub struct LogManager {
    shared: Arc<ManagerShared>,
    scheduler: Arc<Scheduler>,
    consumer: Mutex<Option<thread::JoinHandle<()>>>,
}

impl LogManager {
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> ManagerBuilder {
        ManagerBuilder::new()
    }

    fn start(
        targets: Vec<ConfiguredTarget>,
        formatters: FormatterRegistry,
        fault_sink: Option<FaultSink>,
        scheduler: Arc<Scheduler>,
    ) -> Self {
        let (tx, rx): (Sender<LogEntry>, Receiver<LogEntry>) = unbounded();

        let shared = Arc::new(ManagerShared {
            targets: RwLock::new(targets),
            formatters,
            sender: RwLock::new(Some(tx)),
            fault_sink,
        });

        let consumer_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("tidelog-dispatch".to_string())
            .spawn(move || {
                // Runs until the queue is closed and drained.
                for entry in rx.iter() {
                    consumer_shared.dispatch(&entry);
                }
            })
            .expect("failed to spawn dispatch thread");

        Self {
            shared,
            scheduler,
            consumer: Mutex::new(Some(handle)),
        }
    }

    /// Enqueue an entry for dispatch. Never blocks beyond the channel push
    /// and never fails into the caller; submissions after `drain` are
    /// reported through the fault sink.
    pub fn submit(&self, entry: LogEntry) {
        self.shared.submit(entry);
    }

    /// A named logger handle writing into this manager.
    pub fn logger(&self, name: impl Into<String>) -> Logger {
        Logger::new(Arc::clone(&self.shared), name)
    }

    /// Append a target to the dispatch order. Safe while the consumer runs.
    pub fn add_target(&self, target: ConfiguredTarget) {
        self.shared.targets.write().push(target);
    }

    pub fn formatters(&self) -> &FormatterRegistry {
        &self.shared.formatters
    }

    /// Timer scheduler shared with periodic targets.
    pub fn scheduler(&self) -> Arc<Scheduler> {
        Arc::clone(&self.scheduler)
    }

    /// Close the queue to new submissions, wait until every already-queued
    /// entry has been processed, then flush every target. Idempotent.
    pub fn drain(&self) {
        // Dropping the sender closes the channel; the consumer exits once
        // the queue is empty.
        drop(self.shared.sender.write().take());

        if let Some(handle) = self.consumer.lock().take() {
            if handle.join().is_err() {
                self.shared.report(&LoggerError::other(
                    "dispatch thread panicked; manager is stopped",
                ));
            }
        }

        self.shared.flush_all();
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LogManager {
    fn drop(&mut self) {
        self.drain();
    }
}

/// Fluent construction of a `LogManager`.
pub struct ManagerBuilder {
    targets: Vec<ConfiguredTarget>,
    formatters: FormatterRegistry,
    fault_sink: Option<FaultSink>,
    scheduler: Arc<Scheduler>,
}

impl ManagerBuilder {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            formatters: FormatterRegistry::with_defaults(),
            fault_sink: None,
            scheduler: Arc::new(Scheduler::new()),
        }
    }

    /// Add an unfiltered target.
    #[must_use = "builder methods return a new value"]
    pub fn target(mut self, target: impl crate::targets::Target + 'static) -> Self {
        self.targets.push(ConfiguredTarget::new(target));
        self
    }

    /// Add a target with its filter state.
    #[must_use = "builder methods return a new value"]
    pub fn configured_target(mut self, target: ConfiguredTarget) -> Self {
        self.targets.push(target);
        self
    }

    /// Replace the formatter registry.
    #[must_use = "builder methods return a new value"]
    pub fn formatters(mut self, formatters: FormatterRegistry) -> Self {
        self.formatters = formatters;
        self
    }

    /// Receive every recovered failure (write errors, panics, late submits).
    #[must_use = "builder methods return a new value"]
    pub fn fault_sink(mut self, sink: FaultSink) -> Self {
        self.fault_sink = Some(sink);
        self
    }

    /// The scheduler periodic targets should register with. Available before
    /// `build` so targets can be constructed against it.
    pub fn scheduler(&self) -> Arc<Scheduler> {
        Arc::clone(&self.scheduler)
    }

    pub fn build(self) -> LogManager {
        LogManager::start(self.targets, self.formatters, self.fault_sink, self.scheduler)
    }
}

impl Default for ManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
