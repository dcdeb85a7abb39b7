//! Search-as-you-type support.
//!
//! # Responsibility
//! - Describe search requests (`SearchOptions`).
//! - Debounce keystrokes and discard stale results (`SearchSession`).
//!
//! Matching itself is the pure filter in `view::filter`.

pub mod session;

pub use session::{SearchSession, SearchTicket, DEFAULT_DEBOUNCE};

use crate::view::filter::QUICK_SEARCH_LIMIT;

/// Options for one search request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of results; `None` returns every match.
    pub limit: Option<usize>,
}

impl SearchOptions {
    /// Options for the quick-search dropdown.
    pub fn quick() -> Self {
        Self {
            limit: Some(QUICK_SEARCH_LIMIT),
        }
    }
}
