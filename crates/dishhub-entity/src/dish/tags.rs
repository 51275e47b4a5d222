//! Tag list codec.
//!
//! Tags are persisted as one comma-joined string. There is no escaping: a
//! tag that itself contains a comma comes back split into several tags.

/// Separator between tags in the persisted string.
pub const TAG_SEPARATOR: char = ',';

/// Decode a persisted tag string into a list, preserving order.
///
/// Entries that are empty or whitespace-only are dropped. Surviving
/// entries are returned as stored, without trimming.
pub fn decode_tags(raw: &str) -> Vec<String> {
    raw.split(TAG_SEPARATOR)
        .filter(|tag| !tag.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Encode a tag list into its persisted string.
pub fn encode_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&TAG_SEPARATOR.to_string())
}
