//! Entry repository contract and backend adapters.
//!
//! # Responsibility
//! - Define one storage interface (`EntryRepository`) for all backends.
//! - Provide a SQLite adapter, an in-memory document adapter and an
//!   owner-scoping wrapper.
//!
//! # Invariants
//! - Adapters validate drafts/patches before any backend mutation.
//! - Adapters normalize records before returning them.
//! - No adapter caches reads; every list hits the backend.

pub mod entry_repo;
pub mod memory_entry_repo;
pub mod scoped_repo;
pub mod sqlite_entry_repo;
