//! Size accounting for inline base64 payloads.

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Approximate decoded byte length of a base64 payload.
///
/// Accepts either a bare payload or a full `data:` URL; the URL header is not
/// counted. `=` padding is subtracted.
pub fn base64_payload_size(value: &str) -> u64 {
    let payload = match value.find(";base64,") {
        Some(pos) if value.starts_with("data:") => &value[pos + ";base64,".len()..],
        _ => value,
    };
    let padding = payload.bytes().filter(|byte| *byte == b'=').count() as u64;
    let len = payload.len() as u64;
    (len * 3 / 4).saturating_sub(padding)
}

/// Formats a byte count as `B`, `KB` or `MB` (one decimal for KB/MB).
pub fn format_bytes(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}
