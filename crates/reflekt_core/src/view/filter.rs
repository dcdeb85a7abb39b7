//! Case-insensitive text filter over title, content and mood.

use crate::model::entry::Entry;

/// Maximum results shown by the quick-search dropdown.
pub const QUICK_SEARCH_LIMIT: usize = 8;

/// Returns the entries whose title, content or mood contains `query`.
///
/// A blank query returns the input unchanged. Otherwise the query is matched
/// as typed, surrounding spaces included. Relative order is preserved.
pub fn filter_entries(entries: &[Entry], query: &str) -> Vec<Entry> {
    if query.trim().is_empty() {
        return entries.to_vec();
    }
    let needle = query.to_lowercase();

    entries
        .iter()
        .filter(|entry| matches_query(entry, &needle))
        .cloned()
        .collect()
}

/// `needle` must already be lowercased.
fn matches_query(entry: &Entry, needle: &str) -> bool {
    entry.title.to_lowercase().contains(needle)
        || entry.content.to_lowercase().contains(needle)
        || entry.mood.as_str().to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::filter_entries;
    use crate::model::entry::{Entry, Mood};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn entry(title: &str, content: &str, mood: Mood) -> Entry {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Entry {
            id: Uuid::new_v4(),
            user_id: "u".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            mood,
            tags: Vec::new(),
            images: Vec::new(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn matches_title_content_and_mood_case_insensitively() {
        let entries = vec![
            entry("Morning Run", "legs tired", Mood::Productive),
            entry("Notes", "Read about RUST lifetimes", Mood::Calm),
            entry("Rainy day", "stayed in", Mood::Sad),
            entry("Other", "nothing", Mood::Happy),
        ];

        assert_eq!(filter_entries(&entries, "run").len(), 1);
        assert_eq!(filter_entries(&entries, "rust")[0].title, "Notes");
        assert_eq!(filter_entries(&entries, "SAD")[0].title, "Rainy day");
    }

    #[test]
    fn blank_query_returns_input_unchanged() {
        let entries = vec![entry("a", "b", Mood::Calm), entry("c", "d", Mood::Sad)];
        assert_eq!(filter_entries(&entries, "   "), entries);
        assert_eq!(filter_entries(&entries, ""), entries);
    }

    #[test]
    fn surrounding_spaces_are_part_of_the_query() {
        let entries = vec![
            entry("Runway", "new shoes", Mood::Happy),
            entry("Log", "went for a run today", Mood::Calm),
        ];
        assert_eq!(filter_entries(&entries, "run").len(), 2);
        let spaced = filter_entries(&entries, " run ");
        assert_eq!(spaced.len(), 1);
        assert_eq!(spaced[0].title, "Log");
    }

    #[test]
    fn filtering_is_idempotent() {
        let entries = vec![
            entry("walk", "park", Mood::Calm),
            entry("work", "walkthrough", Mood::Motivated),
            entry("sleep", "early", Mood::Calm),
        ];
        let once = filter_entries(&entries, "walk");
        let twice = filter_entries(&once, "walk");
        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn input_is_not_mutated() {
        let entries = vec![entry("keep", "me", Mood::Calm), entry("drop", "x", Mood::Calm)];
        let snapshot = entries.clone();
        let _ = filter_entries(&entries, "keep");
        assert_eq!(entries, snapshot);
    }
}
