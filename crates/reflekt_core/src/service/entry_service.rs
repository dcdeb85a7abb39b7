//! Entry use-case service.
//!
//! # Responsibility
//! - Wrap any `EntryRepository` and return `{data, error}` envelopes.
//! - Compose repository reads with derived views (search, calendar, export).
//!
//! # Invariants
//! - No call panics or returns `Err`; failures travel in `error`.
//! - Search, calendar and export only ever see the owner's entries.

use crate::export::{export_entries, ExportDocument, ExportFormat};
use crate::model::entry::{EntryDraft, EntryId, EntryPatch};
use crate::repo::entry_repo::{EntryRepository, RepoError};
use crate::search::SearchOptions;
use crate::service::response::{
    DeleteResponse, EntryListResponse, EntryResponse, ErrorInfo, ServiceResponse,
};
use crate::view::calendar::{group_by_day_in, DayGroups};
use crate::view::filter::filter_entries;
use chrono::{Local, NaiveDate, TimeZone};
use log::{info, warn};
use std::time::Instant;

/// Use-case facade over one repository adapter.
pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Stores a new entry for `owner_id`.
    pub fn create_entry(&self, owner_id: &str, draft: &EntryDraft) -> EntryResponse {
        let started = Instant::now();
        match self.repo.create_entry(owner_id, draft) {
            Ok(entry) => {
                info!(
                    "event=entry_create module=service status=ok entry_id={} images={} duration_ms={}",
                    entry.id,
                    entry.images.len(),
                    started.elapsed().as_millis()
                );
                ServiceResponse::ok(Some(entry))
            }
            Err(err) => ServiceResponse::failed(None, failure("entry_create", &err)),
        }
    }

    pub fn get_entry(&self, id: EntryId) -> EntryResponse {
        match self.repo.get_entry(id) {
            Ok(entry) => ServiceResponse::ok(entry),
            Err(err) => ServiceResponse::failed(None, failure("entry_get", &err)),
        }
    }

    /// Owner's entries, newest first. A failed load yields empty `data`.
    pub fn list_entries(&self, owner_id: &str) -> EntryListResponse {
        let started = Instant::now();
        match self.repo.list_entries(owner_id) {
            Ok(entries) => {
                info!(
                    "event=entry_list module=service status=ok count={} duration_ms={}",
                    entries.len(),
                    started.elapsed().as_millis()
                );
                ServiceResponse::ok(entries)
            }
            Err(err) => ServiceResponse::failed(Vec::new(), failure("entry_list", &err)),
        }
    }

    pub fn update_entry(&self, id: EntryId, patch: &EntryPatch) -> EntryResponse {
        match self.repo.update_entry(id, patch) {
            Ok(entry) => {
                info!("event=entry_update module=service status=ok entry_id={id}");
                ServiceResponse::ok(Some(entry))
            }
            Err(err) => ServiceResponse::failed(None, failure("entry_update", &err)),
        }
    }

    pub fn delete_entry(&self, id: EntryId) -> DeleteResponse {
        match self.repo.delete_entry(id) {
            Ok(()) => {
                info!("event=entry_delete module=service status=ok entry_id={id}");
                ServiceResponse::ok(())
            }
            Err(err) => ServiceResponse::failed((), failure("entry_delete", &err)),
        }
    }

    /// Filters the owner's entries by `query`, keeping newest-first order.
    pub fn search_entries(
        &self,
        owner_id: &str,
        query: &str,
        options: &SearchOptions,
    ) -> EntryListResponse {
        let listed = self.list_entries(owner_id);
        if listed.error.is_some() {
            return listed;
        }

        let mut matches = filter_entries(&listed.data, query);
        if let Some(limit) = options.limit {
            matches.truncate(limit);
        }
        info!(
            "event=entry_search module=service status=ok scanned={} matched={} limit={:?}",
            listed.data.len(),
            matches.len(),
            options.limit
        );
        ServiceResponse::ok(matches)
    }

    /// Owner's entries grouped by creation date in `tz`.
    pub fn calendar_in<Tz: TimeZone>(&self, owner_id: &str, tz: &Tz) -> ServiceResponse<DayGroups> {
        let listed = self.list_entries(owner_id);
        match listed.error {
            Some(error) => ServiceResponse::failed(DayGroups::new(), error),
            None => ServiceResponse::ok(group_by_day_in(&listed.data, tz)),
        }
    }

    /// [`Self::calendar_in`] on the deployment clock.
    pub fn calendar(&self, owner_id: &str) -> ServiceResponse<DayGroups> {
        self.calendar_in(owner_id, &Local)
    }

    /// Renders every owner entry as an export document dated `today`.
    pub fn export(
        &self,
        owner_id: &str,
        format: ExportFormat,
        prefix: &str,
        today: NaiveDate,
    ) -> ServiceResponse<Option<ExportDocument>> {
        let listed = self.list_entries(owner_id);
        if let Some(error) = listed.error {
            return ServiceResponse::failed(None, error);
        }

        match export_entries(&listed.data, format, prefix, today) {
            Ok(document) => {
                info!(
                    "event=entry_export module=service status=ok format={} count={} bytes={}",
                    format.extension(),
                    listed.data.len(),
                    document.body.len()
                );
                ServiceResponse::ok(Some(document))
            }
            Err(err) => {
                warn!(
                    "event=entry_export module=service status=error format={} error_code=invalid_data",
                    format.extension()
                );
                ServiceResponse::failed(None, ErrorInfo::new("invalid_data", err.to_string()))
            }
        }
    }
}

fn failure(event: &str, err: &RepoError) -> ErrorInfo {
    let info = ErrorInfo::from(err);
    warn!(
        "event={event} module=service status=error error_code={}",
        info.code
    );
    info
}
