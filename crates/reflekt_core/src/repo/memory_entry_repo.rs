//! In-process document-store entry repository.
//!
//! # Responsibility
//! - Store raw `EntryRecord` documents in an unordered map, the way a
//!   document backend or browser key-value store holds them.
//! - Re-sort client-side on every list, since storage order is undefined.
//!
//! # Invariants
//! - Records may lack optional fields; reads always normalize.
//! - `updated_at` never moves backwards even if the wall clock does.
//! - While unavailable, every operation fails with `Unavailable` and mutates
//!   nothing.

use crate::model::entry::{Entry, EntryDraft, EntryId, EntryPatch, EntryRecord};
use crate::repo::entry_repo::{require_owner, EntryRepository, RepoError, RepoResult};
use crate::view::order::sort_newest_first;
use chrono::Utc;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use uuid::Uuid;

/// Entry repository holding documents in memory.
#[derive(Debug)]
pub struct MemoryEntryRepository {
    records: RefCell<HashMap<EntryId, EntryRecord>>,
    available: Cell<bool>,
}

impl Default for MemoryEntryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEntryRepository {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seeds the store with existing documents.
    pub fn with_records(records: impl IntoIterator<Item = EntryRecord>) -> Self {
        Self {
            records: RefCell::new(records.into_iter().map(|record| (record.id, record)).collect()),
            available: Cell::new(true),
        }
    }

    /// Loads a JSON array snapshot of documents.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<EntryRecord> = serde_json::from_str(json)?;
        Ok(Self::with_records(records))
    }

    /// Writes a JSON array snapshot ordered oldest first.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let records = self.records.borrow();
        let mut snapshot: Vec<&EntryRecord> = records.values().collect();
        snapshot.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        serde_json::to_string_pretty(&snapshot)
    }

    /// Simulates the backend going offline (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    fn ensure_available(&self, operation: &str) -> RepoResult<()> {
        if self.available.get() {
            return Ok(());
        }
        warn!("event=entry_{operation} module=repo backend=memory status=error error_code=unavailable");
        Err(RepoError::Unavailable(
            "in-memory backend is offline".to_string(),
        ))
    }
}

impl EntryRepository for MemoryEntryRepository {
    fn create_entry(&self, owner_id: &str, draft: &EntryDraft) -> RepoResult<Entry> {
        require_owner(owner_id)?;
        let fields = draft.prepare()?;
        self.ensure_available("create")?;

        let now = Utc::now();
        let record = EntryRecord {
            id: Uuid::new_v4(),
            user_id: owner_id.to_string(),
            title: Some(fields.title),
            content: fields.content,
            mood: Some(fields.mood.as_str().to_string()),
            tags: Some(fields.tags),
            images: Some(fields.images),
            created_at: now,
            updated_at: Some(now),
        };
        let entry = record.clone().normalize();
        self.records.borrow_mut().insert(record.id, record);

        info!(
            "event=entry_create module=repo backend=memory status=ok entry_id={}",
            entry.id
        );
        Ok(entry)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        self.ensure_available("get")?;
        Ok(self.records.borrow().get(&id).cloned().map(EntryRecord::normalize))
    }

    fn list_entries(&self, owner_id: &str) -> RepoResult<Vec<Entry>> {
        require_owner(owner_id)?;
        self.ensure_available("list")?;

        let mut entries: Vec<Entry> = self
            .records
            .borrow()
            .values()
            .filter(|record| record.user_id == owner_id)
            .cloned()
            .map(EntryRecord::normalize)
            .collect();
        sort_newest_first(&mut entries);

        debug!(
            "event=entry_list module=repo backend=memory status=ok count={}",
            entries.len()
        );
        Ok(entries)
    }

    fn update_entry(&self, id: EntryId, patch: &EntryPatch) -> RepoResult<Entry> {
        self.ensure_available("update")?;
        let mut records = self.records.borrow_mut();
        let record = records.get_mut(&id).ok_or(RepoError::NotFound(id))?;

        let current = record.clone().normalize();
        let fields = patch.apply_to(&current)?;
        let stamped = Utc::now().max(current.updated_at);

        record.title = Some(fields.title);
        record.content = fields.content;
        record.mood = Some(fields.mood.as_str().to_string());
        record.tags = Some(fields.tags);
        record.images = Some(fields.images);
        record.updated_at = Some(stamped);

        info!("event=entry_update module=repo backend=memory status=ok entry_id={id}");
        Ok(record.clone().normalize())
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        self.ensure_available("delete")?;
        match self.records.borrow_mut().remove(&id) {
            Some(_) => {
                info!("event=entry_delete module=repo backend=memory status=ok entry_id={id}");
                Ok(())
            }
            None => Err(RepoError::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryEntryRepository;
    use crate::model::entry::{EntryDraft, Mood, DEFAULT_TITLE};
    use crate::repo::entry_repo::{EntryRepository, RepoError};

    #[test]
    fn legacy_documents_without_optional_fields_are_normalized() {
        let json = r#"[
            {
                "id": "00000000-0000-4000-8000-000000000001",
                "user_id": "owner-1",
                "content": "from the first prototype",
                "created_at": "2024-03-05T10:00:00Z"
            }
        ]"#;
        let repo = MemoryEntryRepository::from_json(json).unwrap();
        let entries = repo.list_entries("owner-1").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, DEFAULT_TITLE);
        assert_eq!(entries[0].mood, Mood::Calm);
        assert!(entries[0].tags.is_empty());
        assert_eq!(entries[0].updated_at, entries[0].created_at);
    }

    #[test]
    fn unavailable_backend_reports_error_without_mutation() {
        let repo = MemoryEntryRepository::new();
        repo.set_available(false);
        let err = repo
            .create_entry("owner-1", &EntryDraft::new("t", "c"))
            .unwrap_err();
        assert!(matches!(err, RepoError::Unavailable(_)));
        assert!(repo.is_empty());
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let repo = MemoryEntryRepository::new();
        repo.create_entry("owner-1", &EntryDraft::new("a", "b").with_mood(Mood::Happy))
            .unwrap();
        let restored = MemoryEntryRepository::from_json(&repo.to_json().unwrap()).unwrap();
        assert_eq!(
            restored.list_entries("owner-1").unwrap(),
            repo.list_entries("owner-1").unwrap()
        );
    }
}
