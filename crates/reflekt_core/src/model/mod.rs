//! Journal domain model.
//!
//! # Responsibility
//! - Define the entry shape shared by every repository adapter and view.
//!
//! # Invariants
//! - Entries are hard-deleted; there is no tombstone state.
//! - Optional fields are defaulted once, in `EntryRecord::normalize`.

pub mod entry;
