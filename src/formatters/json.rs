//! JSON line rendering
//!
//! One self-contained JSON object per entry, newline-terminated, for log
//! shippers that ingest ndjson. Structured data keys come out sorted; the
//! insertion order `LogData` preserves matters for the text renderer, not
//! here.

use super::registry::EntryConverter;
use crate::core::log_entry::LogEntry;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Default)]
pub struct JsonConverter;

impl JsonConverter {
    pub fn new() -> Self {
        Self
    }
}

impl EntryConverter<String> for JsonConverter {
    fn convert(&self, entry: &LogEntry) -> String {
        let mut obj = Map::new();
        obj.insert("id".into(), json!(entry.id));
        obj.insert("timestamp".into(), json!(entry.created.to_rfc3339()));
        obj.insert("level".into(), json!(entry.level.to_str()));
        obj.insert("source".into(), json!(entry.source));
        obj.insert("message".into(), json!(entry.message()));

        if !entry.data.is_empty() {
            let data: Map<String, Value> = entry
                .data
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_json_value()))
                .collect();
            obj.insert("data".into(), Value::Object(data));
        }
        if let Some(error) = &entry.error {
            obj.insert("error".into(), json!(error.description));
        }

        let mut line = Value::Object(obj).to_string();
        line.push('\n');
        line
    }
}
