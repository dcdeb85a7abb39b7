//! JSON export.

use crate::model::entry::{Entry, Mood};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exported shape of one entry; identity and ownership are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedEntry {
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Entry> for ExportedEntry {
    fn from(entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            content: entry.content.clone(),
            mood: entry.mood,
            tags: entry.tags.clone(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Serializes entries as a pretty-printed JSON array (two-space indent).
pub fn entries_to_json(entries: &[Entry]) -> Result<String, serde_json::Error> {
    let exported: Vec<ExportedEntry> = entries.iter().map(ExportedEntry::from).collect();
    serde_json::to_string_pretty(&exported)
}
