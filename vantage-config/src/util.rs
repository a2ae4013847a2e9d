//! Small environment-variable parsing helpers.

use std::path::PathBuf;

/// Read a non-empty path-valued variable.
pub fn path_var(name: &str) -> Option<PathBuf> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

/// Parse an unsigned integer from a raw string, tolerating surrounding
/// whitespace. Returns `None` on anything unparseable.
pub fn parse_u64(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

/// Read and parse an unsigned integer variable.
pub fn u64_var(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|raw| parse_u64(&raw))
}
