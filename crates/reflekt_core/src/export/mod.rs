//! Journal export to downloadable documents.
//!
//! # Responsibility
//! - Serialize entry lists as pretty JSON or Markdown.
//! - Name export files `<prefix>-export-<YYYY-MM-DD>.<ext>`.
//!
//! # Invariants
//! - Exports never include `id` or `user_id`.
//! - Entry order is preserved as given; callers sort beforehand.
//! - An empty entry list yields a valid, empty-bodied document.

pub mod json;
pub mod markdown;

pub use json::{entries_to_json, ExportedEntry};
pub use markdown::{entries_to_markdown, entries_to_markdown_in};

use crate::model::entry::Entry;
use chrono::{Local, NaiveDate};
use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default file name prefix.
pub const DEFAULT_EXPORT_PREFIX: &str = "reflekt";

/// Supported export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Markdown => "text/markdown",
        }
    }

    /// Parses `json`, `md` or `markdown`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// A rendered export ready to be written or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub mime_type: &'static str,
    /// UTF-8 document body.
    pub body: String,
}

impl ExportDocument {
    /// Writes the document into `dir` and returns the full path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        fs::write(&path, self.body.as_bytes())?;
        info!(
            "event=export_write module=export status=ok file={} bytes={}",
            self.file_name,
            self.body.len()
        );
        Ok(path)
    }
}

/// Builds `<prefix>-export-<YYYY-MM-DD>.<ext>`.
pub fn export_file_name(prefix: &str, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{prefix}-export-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Renders `entries` in `format`, dated `today` in the local zone.
pub fn export_entries(
    entries: &[Entry],
    format: ExportFormat,
    prefix: &str,
    today: NaiveDate,
) -> Result<ExportDocument, serde_json::Error> {
    let body = match format {
        ExportFormat::Json => entries_to_json(entries)?,
        ExportFormat::Markdown => entries_to_markdown_in(entries, today, &Local),
    };
    Ok(ExportDocument {
        file_name: export_file_name(prefix, format, today),
        mime_type: format.mime_type(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::{export_entries, export_file_name, ExportFormat};
    use chrono::NaiveDate;

    #[test]
    fn file_name_uses_prefix_and_date_stamp() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            export_file_name("reflekt", ExportFormat::Json, date),
            "reflekt-export-2024-03-05.json"
        );
        assert_eq!(
            export_file_name("diary", ExportFormat::Markdown, date),
            "diary-export-2024-03-05.md"
        );
    }

    #[test]
    fn empty_list_exports_valid_documents() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let json = export_entries(&[], ExportFormat::Json, "reflekt", date).unwrap();
        assert_eq!(json.body, "[]");
        assert_eq!(json.mime_type, "application/json");

        let md = export_entries(&[], ExportFormat::Markdown, "reflekt", date).unwrap();
        assert!(md.body.starts_with("# Reflekt Journal Export"));
        assert!(!md.body.contains("## "));
    }

    #[test]
    fn format_parse_accepts_aliases() {
        assert_eq!(ExportFormat::parse("MD"), Some(ExportFormat::Markdown));
        assert_eq!(ExportFormat::parse("markdown"), Some(ExportFormat::Markdown));
        assert_eq!(ExportFormat::parse("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("csv"), None);
    }
}
