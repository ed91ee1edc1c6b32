//! Per-target accept/reject rules
//!
//! A target accepts an entry when its level matches the configured level rule
//! and its source matches the optional glob pattern. The level rule is either
//! an explicit set or an inclusive min/max range; the two are mutually
//! exclusive and setting one clears the other.

use crate::core::error::{LoggerError, Result};
use crate::core::level::Level;
use crate::core::log_entry::LogEntry;
use regex::Regex;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum LevelRule {
    /// Explicit set of accepted levels.
    Set(BTreeSet<Level>),
    /// Inclusive range over the ordered level enum. Unset bounds are open;
    /// both unset means all levels.
    Range {
        min: Option<Level>,
        max: Option<Level>,
    },
}

impl Default for LevelRule {
    fn default() -> Self {
        LevelRule::Range { min: None, max: None }
    }
}

impl LevelRule {
    fn matches(&self, level: Level) -> bool {
        match self {
            LevelRule::Set(levels) => levels.contains(&level),
            LevelRule::Range { min, max } => {
                min.is_none_or(|m| level >= m) && max.is_none_or(|m| level <= m)
            }
        }
    }

    fn effective_levels(&self) -> BTreeSet<Level> {
        Level::all().into_iter().filter(|l| self.matches(*l)).collect()
    }
}

/// Anchored glob over the entry source: `*` matches any run of characters,
/// `?` exactly one. Case-sensitive.
#[derive(Debug, Clone)]
struct SourcePattern {
    pattern: String,
    regex: Regex,
}

impl SourcePattern {
    fn compile(pattern: &str) -> Result<Self> {
        let escaped = regex::escape(pattern).replace(r"\*", ".*").replace(r"\?", ".");
        let regex = Regex::new(&format!("^{}$", escaped)).map_err(|e| {
            LoggerError::config("source pattern", format!("'{}': {}", pattern, e))
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    levels: LevelRule,
    source: Option<SourcePattern>,
    is_final: bool,
}

impl TargetFilter {
    /// No filtering: all levels, any source, not final.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept exactly these levels. Clears any min/max range.
    #[must_use]
    pub fn with_levels<I: IntoIterator<Item = Level>>(mut self, levels: I) -> Self {
        self.levels = LevelRule::Set(levels.into_iter().collect());
        self
    }

    /// Accept levels >= `min`. Clears an explicit level set.
    #[must_use]
    pub fn with_min_level(mut self, min: Level) -> Self {
        self.levels = match self.levels {
            LevelRule::Range { max, .. } => LevelRule::Range { min: Some(min), max },
            LevelRule::Set(_) => LevelRule::Range { min: Some(min), max: None },
        };
        self
    }

    /// Accept levels <= `max`. Clears an explicit level set.
    #[must_use]
    pub fn with_max_level(mut self, max: Level) -> Self {
        self.levels = match self.levels {
            LevelRule::Range { min, .. } => LevelRule::Range { min, max: Some(max) },
            LevelRule::Set(_) => LevelRule::Range { min: None, max: Some(max) },
        };
        self
    }

    /// Only accept entries whose source matches the glob `pattern`.
    pub fn with_source(mut self, pattern: &str) -> Result<Self> {
        self.source = Some(SourcePattern::compile(pattern)?);
        Ok(self)
    }

    /// Stop evaluating later targets once this one matches an entry.
    #[must_use]
    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// The effective level set, derived from the range unless an explicit
    /// set was assigned.
    pub fn levels(&self) -> BTreeSet<Level> {
        self.levels.effective_levels()
    }

    pub fn source_pattern(&self) -> Option<&str> {
        self.source.as_ref().map(|p| p.pattern.as_str())
    }

    /// Pure: depends only on filter state and the entry's level and source.
    pub fn should_write(&self, entry: &LogEntry) -> bool {
        let level_matches = self.levels.matches(entry.level);
        let source_matches = self
            .source
            .as_ref()
            .is_none_or(|p| p.regex.is_match(&entry.source));
        level_matches && source_matches
    }
}
