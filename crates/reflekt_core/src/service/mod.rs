//! Entry use-case services.
//!
//! # Responsibility
//! - Turn repository results into `{data, error}` envelopes.
//! - Keep CLI and embedding layers decoupled from storage details.

pub mod entry_service;
pub mod response;

pub use entry_service::EntryService;
pub use response::{
    DeleteResponse, EntryListResponse, EntryResponse, ErrorInfo, ServiceResponse,
};
