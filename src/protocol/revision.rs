//! Revision-id normalisation: turn an arbitrary cache key into a bounded,
//! charset-safe token.
//!
//! The server caches conversions under a caller-chosen key, but enforces a
//! 20-character limit and a restricted charset. Callers routinely pass whole
//! document URLs as keys, so anything over the limit is replaced by its
//! CRC-32 rendered in decimal (at most 10 digits) before filtering. CRC-32
//! collisions are acceptable: the key is a cache hint, not a security token —
//! a collision at worst serves a cached conversion of a different document
//! revision.

/// Characters the conversion server accepts in a revision id.
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '=' | '-')
}

/// Normalise a raw cache key into a valid revision id.
///
/// Pure and deterministic: the same input always yields the same id, so
/// repeated requests for the same logical document hit the server-side
/// conversion cache.
///
/// Steps, in order:
/// 1. keys longer than 20 characters are replaced by their decimal CRC-32
/// 2. every character outside `[0-9A-Za-z_.=-]` becomes `_`
/// 3. the result is cut to at most 20 characters
///
/// # Example
/// ```rust
/// use docserv_convert::normalize_revision_id;
///
/// assert_eq!(normalize_revision_id("doc.docx"), "doc.docx");
/// assert_eq!(normalize_revision_id("a key"), "a_key");
/// ```
pub fn normalize_revision_id(raw: &str) -> String {
    let key = if raw.chars().count() > 20 {
        crc32fast::hash(raw.as_bytes()).to_string()
    } else {
        raw.to_string()
    };

    key.chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .take(20)
        .collect()
}
