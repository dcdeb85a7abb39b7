//! SQLite-backed entry repository.
//!
//! # Responsibility
//! - Persist entries with tags/images in child tables.
//! - Assign ids and timestamps on the storage side.
//!
//! # Invariants
//! - Timestamps come from SQLite's clock, in epoch milliseconds.
//! - `updated_at` is written as `MAX(updated_at, now)` so it never decreases.
//! - Multi-table writes run in one transaction.
//! - Reads go through `EntryRecord::normalize`.

use crate::db::migrations::{current_version, latest_version};
use crate::model::entry::{Entry, EntryDraft, EntryFields, EntryId, EntryPatch, EntryRecord};
use crate::repo::entry_repo::{require_owner, EntryRepository, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Current time in epoch milliseconds, evaluated by SQLite.
const NOW_MS_SQL: &str = "CAST(ROUND((julianday('now') - 2440587.5) * 86400000.0) AS INTEGER)";

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    content,
    mood,
    created_at,
    updated_at
FROM entries";

const REQUIRED_TABLES: [&str; 3] = ["entries", "entry_tags", "entry_images"];

/// Entry repository over a migrated SQLite connection.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Wraps a connection after checking schema version and tables.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when the schema is incomplete.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry(&self, owner_id: &str, draft: &EntryDraft) -> RepoResult<Entry> {
        require_owner(owner_id)?;
        let fields = draft.prepare()?;
        let id = Uuid::new_v4();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            &format!(
                "INSERT INTO entries (id, user_id, title, content, mood, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, {NOW_MS_SQL}, {NOW_MS_SQL});"
            ),
            params![
                id.to_string(),
                owner_id,
                fields.title.as_str(),
                fields.content.as_str(),
                fields.mood.as_str(),
            ],
        )?;
        replace_children(&tx, id, &fields)?;
        tx.commit()?;

        info!(
            "event=entry_create module=repo backend=sqlite status=ok entry_id={} tags={} images={}",
            id,
            fields.tags.len(),
            fields.images.len()
        );
        load_entry(self.conn, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created entry {id} missing on read-back"))
        })
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        load_entry(self.conn, id)
    }

    fn list_entries(&self, owner_id: &str) -> RepoResult<Vec<Entry>> {
        require_owner(owner_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(self.conn, row)?);
        }

        debug!(
            "event=entry_list module=repo backend=sqlite status=ok count={}",
            entries.len()
        );
        Ok(entries)
    }

    fn update_entry(&self, id: EntryId, patch: &EntryPatch) -> RepoResult<Entry> {
        let tx = self.conn.unchecked_transaction()?;
        let current = load_entry(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        let fields = patch.apply_to(&current)?;

        let changed = tx.execute(
            &format!(
                "UPDATE entries
                 SET
                    title = ?2,
                    content = ?3,
                    mood = ?4,
                    updated_at = MAX(updated_at, {NOW_MS_SQL})
                 WHERE id = ?1;"
            ),
            params![
                id.to_string(),
                fields.title.as_str(),
                fields.content.as_str(),
                fields.mood.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        replace_children(&tx, id, &fields)?;
        tx.commit()?;

        info!("event=entry_update module=repo backend=sqlite status=ok entry_id={id}");
        load_entry(self.conn, id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let id_text = id.to_string();
        tx.execute("DELETE FROM entry_tags WHERE entry_id = ?1;", [&id_text])?;
        tx.execute("DELETE FROM entry_images WHERE entry_id = ?1;", [&id_text])?;
        let changed = tx.execute("DELETE FROM entries WHERE id = ?1;", [&id_text])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        info!("event=entry_delete module=repo backend=sqlite status=ok entry_id={id}");
        Ok(())
    }
}

fn load_entry(conn: &Connection, id: EntryId) -> RepoResult<Option<Entry>> {
    let mut stmt = conn.prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_entry_row(conn, row)?)),
        None => Ok(None),
    }
}

fn parse_entry_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Entry> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{id_text}` in entries.id")))?;

    let record = EntryRecord {
        id,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        mood: row.get("mood")?,
        tags: Some(load_children(conn, "entry_tags", "tag", &id_text)?),
        images: Some(load_children(conn, "entry_images", "data_url", &id_text)?),
        created_at: parse_millis(row.get("created_at")?, "created_at")?,
        updated_at: Some(parse_millis(row.get("updated_at")?, "updated_at")?),
    };
    Ok(record.normalize())
}

fn parse_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("timestamp {value} out of range in entries.{column}"))
    })
}

fn load_children(
    conn: &Connection,
    table: &str,
    column: &str,
    entry_id: &str,
) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {column} FROM {table} WHERE entry_id = ?1 ORDER BY position ASC;"
    ))?;
    let mut rows = stmt.query([entry_id])?;
    let mut values = Vec::new();
    while let Some(row) = rows.next()? {
        values.push(row.get(0)?);
    }
    Ok(values)
}

fn replace_children(conn: &Connection, id: EntryId, fields: &EntryFields) -> RepoResult<()> {
    let id_text = id.to_string();
    conn.execute("DELETE FROM entry_tags WHERE entry_id = ?1;", [&id_text])?;
    conn.execute("DELETE FROM entry_images WHERE entry_id = ?1;", [&id_text])?;

    for (position, tag) in fields.tags.iter().enumerate() {
        conn.execute(
            "INSERT INTO entry_tags (entry_id, position, tag) VALUES (?1, ?2, ?3);",
            params![id_text, position as i64, tag],
        )?;
    }
    for (position, data_url) in fields.images.iter().enumerate() {
        conn.execute(
            "INSERT INTO entry_images (entry_id, position, data_url) VALUES (?1, ?2, ?3);",
            params![id_text, position as i64, data_url],
        )?;
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
