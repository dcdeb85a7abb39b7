//! Markdown export.

use crate::model::entry::Entry;
use crate::view::dates::format_entry_timestamp_in;
use chrono::{Local, NaiveDate, TimeZone};
use std::fmt::Write;

const DOCUMENT_TITLE: &str = "Reflekt Journal Export";
const RULE: &str = "---";

/// Renders a Markdown journal, formatting dates in `tz`.
///
/// Layout per entry: `## title`, date line, mood line, optional tags line
/// (`#tag`), blank line, content, horizontal rule.
pub fn entries_to_markdown_in<Tz: TimeZone>(
    entries: &[Entry],
    exported_on: NaiveDate,
    tz: &Tz,
) -> String {
    let mut md = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        md,
        "# {DOCUMENT_TITLE}\n\nExported on {}\n\n{RULE}\n\n",
        exported_on.format("%A, %B %-d, %Y")
    );

    for entry in entries {
        let _ = write!(md, "## {}\n\n", entry.display_title());
        let _ = write!(
            md,
            "**Date:** {}  \n",
            format_entry_timestamp_in(&entry.created_at, tz)
        );
        let _ = write!(md, "**Mood:** {}  \n", entry.mood);
        if !entry.tags.is_empty() {
            let tags = entry
                .tags
                .iter()
                .map(|tag| format!("#{tag}"))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(md, "**Tags:** {tags}  \n");
        }
        let _ = write!(md, "\n{}\n\n{RULE}\n\n", entry.content);
    }

    md
}

/// [`entries_to_markdown_in`] on the deployment clock.
pub fn entries_to_markdown(entries: &[Entry], exported_on: NaiveDate) -> String {
    entries_to_markdown_in(entries, exported_on, &Local)
}
