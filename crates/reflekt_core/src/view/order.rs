//! Newest-first ordering.

use crate::model::entry::Entry;
use std::cmp::Ordering;

/// Orders entries by `created_at` descending; ties break on `id` ascending.
pub fn compare_newest_first(a: &Entry, b: &Entry) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts in place, newest first.
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(compare_newest_first);
}

/// Returns whether the slice is already newest-first.
pub fn is_newest_first(entries: &[Entry]) -> bool {
    entries
        .windows(2)
        .all(|pair| compare_newest_first(&pair[0], &pair[1]) != Ordering::Greater)
}
