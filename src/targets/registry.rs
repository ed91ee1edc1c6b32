//! Declarative target construction
//!
//! Configuration names targets by a string tag plus string settings. The
//! registry maps tags to constructor closures; unknown tags fail with a
//! configuration error instead of being looked up by reflection or skipped.
//! Filter settings (`level`, `minlevel`, `maxlevel`, `source`, `final`) are
//! shared across all target kinds and parsed here.

use super::console::{ColoredConsoleTarget, ConsoleTarget};
use super::file::FileTarget;
use super::filter::TargetFilter;
use super::memory::MemoryTarget;
use super::null::NullTarget;
use super::periodic_file::PeriodicFileTarget;
use super::trace::TraceTarget;
use super::{ConfiguredTarget, Target};
use crate::core::error::{LoggerError, Result};
use crate::core::interval::Interval;
use crate::core::level::Level;
use crate::core::scheduler::Scheduler;
use std::collections::HashMap;
use std::sync::Arc;

/// String key/value description of one target, as found in configuration.
#[derive(Debug, Clone, Default)]
pub struct TargetSettings {
    kind: String,
    values: HashMap<String, String>,
}

impl TargetSettings {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into().to_lowercase(),
            values: HashMap::new(),
        }
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into().to_lowercase(), value.into());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| {
            LoggerError::config(
                self.kind.clone(),
                format!("missing required setting '{}'", key),
            )
        })
    }

    fn parse<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                LoggerError::config(
                    self.kind.clone(),
                    format!("invalid value '{}' for setting '{}'", raw, key),
                )
            }),
        }
    }
}

type Factory = Box<dyn Fn(&TargetSettings) -> Result<Box<dyn Target>> + Send + Sync>;

pub struct TargetRegistry {
    factories: HashMap<String, Factory>,
}

impl TargetRegistry {
    /// An empty registry. Use [`with_defaults`](Self::with_defaults) for the
    /// built-in target kinds.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry pre-populated with the built-in kinds: `console`,
    /// `colored_console`, `trace`, `null`, `memory`, `file`, `periodic_file`.
    /// Email targets need a transport and are registered by the caller.
    pub fn with_defaults(scheduler: Arc<Scheduler>) -> Self {
        let mut registry = Self::new();
        registry.register("console", |_| Ok(Box::new(ConsoleTarget::new())));
        registry.register("colored_console", |_| {
            Ok(Box::new(ColoredConsoleTarget::new()))
        });
        registry.register("trace", |_| Ok(Box::new(TraceTarget::new())));
        registry.register("null", |_| Ok(Box::new(NullTarget::new())));
        registry.register("memory", |settings| {
            Ok(match settings.parse::<usize>("capacity")? {
                Some(capacity) => Box::new(MemoryTarget::with_capacity(capacity)),
                None => Box::new(MemoryTarget::unbounded()),
            })
        });
        registry.register("file", |settings| {
            Ok(Box::new(FileTarget::new(settings.require("path")?)))
        });
        registry.register("periodic_file", move |settings| {
            let mut builder =
                PeriodicFileTarget::builder(settings.require("dir")?, Arc::clone(&scheduler));
            if let Some(interval) = settings.parse::<Interval>("interval")? {
                builder = builder.interval(interval);
            }
            if let Some(count) = settings.parse::<usize>("circulation_count")? {
                builder = builder.circulation_count(count);
            }
            Ok(Box::new(builder.build()?))
        });
        registry
    }

    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&TargetSettings) -> Result<Box<dyn Target>> + Send + Sync + 'static,
    {
        self.factories
            .insert(kind.into().to_lowercase(), Box::new(factory));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(&kind.to_lowercase())
    }

    /// Construct the target named by `settings`, with its filter applied.
    pub fn build(&self, settings: &TargetSettings) -> Result<ConfiguredTarget> {
        let factory = self.factories.get(settings.kind()).ok_or_else(|| {
            LoggerError::config(
                settings.kind().to_string(),
                "unknown target kind".to_string(),
            )
        })?;
        let target = factory(settings)?;
        Ok(ConfiguredTarget::boxed(target).with_filter(filter_from_settings(settings)?))
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn filter_from_settings(settings: &TargetSettings) -> Result<TargetFilter> {
    let mut filter = TargetFilter::new();

    let set = settings.get("level").or_else(|| settings.get("levels"));
    let min: Option<Level> = settings.parse("minlevel")?;
    let max: Option<Level> = settings.parse("maxlevel")?;
    if set.is_some() && (min.is_some() || max.is_some()) {
        return Err(LoggerError::config(
            settings.kind().to_string(),
            "'level' and 'minlevel'/'maxlevel' are mutually exclusive",
        ));
    }

    if let Some(raw) = set {
        let mut levels = Vec::new();
        for part in raw.split(',') {
            let level = part.trim().parse::<Level>().map_err(|e| {
                LoggerError::config(settings.kind().to_string(), e)
            })?;
            levels.push(level);
        }
        filter = filter.with_levels(levels);
    }
    if let Some(min) = min {
        filter = filter.with_min_level(min);
    }
    if let Some(max) = max {
        filter = filter.with_max_level(max);
    }
    if let Some(pattern) = settings.get("source") {
        filter = filter.with_source(pattern)?;
    }
    if let Some(raw) = settings.get("final") {
        filter = filter.with_final(parse_bool(settings.kind(), "final", raw)?);
    }
    Ok(filter)
}

fn parse_bool(kind: &str, key: &str, raw: &str) -> Result<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(LoggerError::config(
            kind.to_string(),
            format!("invalid value '{}' for setting '{}'", raw, key),
        )),
    }
}
