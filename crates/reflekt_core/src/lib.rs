//! Core domain logic for the Reflekt journal.
//! This crate is the single source of truth for entry invariants.

pub mod attachment;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod preferences;
pub mod repo;
pub mod search;
pub mod service;
pub mod view;

pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError};
pub use export::{ExportDocument, ExportFormat};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::entry::{
    Entry, EntryDraft, EntryId, EntryPatch, EntryRecord, EntryValidationError, Mood,
};
pub use repo::entry_repo::{EntryRepository, RepoError, RepoResult};
pub use repo::memory_entry_repo::MemoryEntryRepository;
pub use repo::scoped_repo::OwnerScopedRepository;
pub use repo::sqlite_entry_repo::SqliteEntryRepository;
pub use search::{SearchOptions, SearchSession};
pub use service::{EntryService, ErrorInfo, ServiceResponse};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
