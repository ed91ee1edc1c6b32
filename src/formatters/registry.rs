//! Formatter registry: output type to entry converter
//!
//! Targets render entries through a converter looked up by output type. Only
//! `String` output ships by default; the contract is generic so binary
//! formats can be registered without touching the core.

use crate::core::error::{LoggerError, Result};
use crate::core::log_entry::LogEntry;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Converts a log entry into a target's required output representation.
pub trait EntryConverter<O>: Send + Sync {
    fn convert(&self, entry: &LogEntry) -> O;
}

/// Blanket impl so plain functions and closures can be registered.
impl<O, F> EntryConverter<O> for F
where
    F: Fn(&LogEntry) -> O + Send + Sync,
{
    fn convert(&self, entry: &LogEntry) -> O {
        self(entry)
    }
}

pub struct FormatterRegistry {
    converters: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl FormatterRegistry {
    /// Empty registry, no default converters.
    pub fn empty() -> Self {
        Self {
            converters: RwLock::new(HashMap::new()),
        }
    }

    /// Registry with the default text converter registered for `String`.
    pub fn with_defaults() -> Self {
        let registry = Self::empty();
        registry.register::<String>(Arc::new(super::text::DefaultStringConverter::new()));
        registry
    }

    pub fn register<O: 'static>(&self, converter: Arc<dyn EntryConverter<O>>) {
        self.converters
            .write()
            .insert(TypeId::of::<O>(), Box::new(converter));
    }

    /// Look up the converter for output type `O`.
    ///
    /// # Errors
    ///
    /// `FormatterNotFound` when no converter is registered for `O`. This is a
    /// misconfiguration the developer must fix; it is not swallowed.
    pub fn get<O: 'static>(&self) -> Result<Arc<dyn EntryConverter<O>>> {
        let converters = self.converters.read();
        converters
            .get(&TypeId::of::<O>())
            .and_then(|boxed| boxed.downcast_ref::<Arc<dyn EntryConverter<O>>>())
            .cloned()
            .ok_or_else(|| LoggerError::formatter_not_found(std::any::type_name::<O>()))
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
