//! Inline image attachments.
//!
//! # Responsibility
//! - Convert user-selected raster images into compact inline `data:` URLs.
//! - Parse and size inline encodings for diagnostics.
//!
//! # Invariants
//! - Decode failures are reported as errors, never as an empty payload.
//! - The per-entry image limit is enforced by `EntryDraft`, not here.

mod compress;
mod size;

pub use compress::{
    compress_image, scaled_dimensions, AttachmentError, CompressOptions, OutputFormat,
    DEFAULT_MAX_WIDTH, DEFAULT_QUALITY,
};
pub use size::{base64_payload_size, format_bytes};

use once_cell::sync::Lazy;
use regex::Regex;

static DATA_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:(image/[A-Za-z0-9.+-]+);base64,([A-Za-z0-9+/]*={0,2})$")
        .expect("valid data url regex")
});

/// Borrowed view of an inline image encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub mime_type: &'a str,
    pub payload: &'a str,
}

/// Parses `data:image/<kind>;base64,<payload>`.
///
/// Returns `None` for anything else, including non-image mime types.
pub fn parse_data_url(value: &str) -> Option<DataUrl<'_>> {
    let caps = DATA_URL_RE.captures(value)?;
    Some(DataUrl {
        mime_type: caps.get(1)?.as_str(),
        payload: caps.get(2)?.as_str(),
    })
}

/// Builds an inline data URL from a mime type and base64 payload.
pub fn to_data_url(mime_type: &str, payload: &str) -> String {
    format!("data:{mime_type};base64,{payload}")
}
