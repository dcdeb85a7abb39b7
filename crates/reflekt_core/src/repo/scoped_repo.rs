//! Owner-scoping rule applied on top of any adapter.
//!
//! Mirrors the backend access rules: a caller may create entries only for
//! itself and may read, update or delete only entries it owns.

use crate::model::entry::{Entry, EntryDraft, EntryId, EntryPatch};
use crate::repo::entry_repo::{EntryRepository, RepoError, RepoResult};
use log::warn;

/// Repository view restricted to one acting owner.
#[derive(Debug)]
pub struct OwnerScopedRepository<R> {
    inner: R,
    owner_id: String,
}

impl<R: EntryRepository> OwnerScopedRepository<R> {
    pub fn new(inner: R, owner_id: impl Into<String>) -> Self {
        Self {
            inner,
            owner_id: owner_id.into(),
        }
    }

    /// Acting owner.
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn deny(&self, operation: &str, detail: String) -> RepoError {
        warn!("event=entry_{operation} module=repo status=error error_code=permission_denied");
        RepoError::PermissionDenied(detail)
    }

    fn require_same_owner(&self, operation: &str, owner_id: &str) -> RepoResult<()> {
        if owner_id == self.owner_id {
            Ok(())
        } else {
            Err(self.deny(
                operation,
                "cannot access another owner's entries".to_string(),
            ))
        }
    }

    fn require_owned(&self, operation: &str, id: EntryId) -> RepoResult<Entry> {
        let entry = self.inner.get_entry(id)?.ok_or(RepoError::NotFound(id))?;
        if entry.user_id != self.owner_id {
            return Err(self.deny(operation, format!("entry {id} belongs to another owner")));
        }
        Ok(entry)
    }
}

impl<R: EntryRepository> EntryRepository for OwnerScopedRepository<R> {
    fn create_entry(&self, owner_id: &str, draft: &EntryDraft) -> RepoResult<Entry> {
        self.require_same_owner("create", owner_id)?;
        self.inner.create_entry(owner_id, draft)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        match self.inner.get_entry(id)? {
            Some(entry) if entry.user_id != self.owner_id => {
                Err(self.deny("get", format!("entry {id} belongs to another owner")))
            }
            other => Ok(other),
        }
    }

    fn list_entries(&self, owner_id: &str) -> RepoResult<Vec<Entry>> {
        self.require_same_owner("list", owner_id)?;
        let mut entries = self.inner.list_entries(owner_id)?;
        entries.retain(|entry| entry.user_id == self.owner_id);
        Ok(entries)
    }

    fn update_entry(&self, id: EntryId, patch: &EntryPatch) -> RepoResult<Entry> {
        self.require_owned("update", id)?;
        self.inner.update_entry(id, patch)
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        self.require_owned("delete", id)?;
        self.inner.delete_entry(id)
    }
}
