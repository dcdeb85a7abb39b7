//! Entry repository contract shared by every backend adapter.
//!
//! # Responsibility
//! - Define the five storage operations application code depends on.
//! - Define the repository error taxonomy.
//!
//! # Invariants
//! - `list_entries` returns only the owner's entries, newest first, normalized.
//! - `update_entry` stamps `updated_at` and never touches `user_id` or
//!   `created_at`.
//! - Write paths validate input before touching the backend.

use crate::db::DbError;
use crate::model::entry::{Entry, EntryDraft, EntryId, EntryPatch, EntryValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    NotFound(EntryId),
    /// Caller is not the owner of the target entry or collection.
    PermissionDenied(String),
    /// Backend cannot be reached.
    Unavailable(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Stable snake_case kind used in response envelopes and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Db(_) | Self::UninitializedConnection { .. } | Self::MissingRequiredTable(_) => {
                "storage"
            }
            Self::NotFound(_) => "not_found",
            Self::PermissionDenied(_) => "permission_denied",
            Self::Unavailable(_) => "unavailable",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::PermissionDenied(message) => write!(f, "permission denied: {message}"),
            Self::Unavailable(message) => write!(f, "backend unavailable: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for journal entries.
///
/// Identifiers and timestamps are assigned by the backend, not the caller.
pub trait EntryRepository {
    /// Validates the draft, stores it for `owner_id` and returns the stored entry.
    fn create_entry(&self, owner_id: &str, draft: &EntryDraft) -> RepoResult<Entry>;
    /// Gets one entry by id.
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    /// Lists every entry owned by `owner_id`, newest first.
    fn list_entries(&self, owner_id: &str) -> RepoResult<Vec<Entry>>;
    /// Replaces the patched fields and returns the stored entry.
    fn update_entry(&self, id: EntryId, patch: &EntryPatch) -> RepoResult<Entry>;
    /// Hard-deletes one entry. Deleting a missing id is `NotFound`.
    fn delete_entry(&self, id: EntryId) -> RepoResult<()>;
}

impl<R: EntryRepository + ?Sized> EntryRepository for &R {
    fn create_entry(&self, owner_id: &str, draft: &EntryDraft) -> RepoResult<Entry> {
        (**self).create_entry(owner_id, draft)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        (**self).get_entry(id)
    }

    fn list_entries(&self, owner_id: &str) -> RepoResult<Vec<Entry>> {
        (**self).list_entries(owner_id)
    }

    fn update_entry(&self, id: EntryId, patch: &EntryPatch) -> RepoResult<Entry> {
        (**self).update_entry(id, patch)
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        (**self).delete_entry(id)
    }
}

/// Rejects blank owner identifiers before any backend call.
pub(crate) fn require_owner(owner_id: &str) -> RepoResult<()> {
    if owner_id.trim().is_empty() {
        return Err(RepoError::Validation(EntryValidationError::MissingOwner));
    }
    Ok(())
}
