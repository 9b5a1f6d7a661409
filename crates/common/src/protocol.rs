//! Rank-0 stdout contract
//!
//! The generation engine appends a human-readable statistics footer after a
//! literal separator line. The text before the first separator is the
//! semantic output; everything after it is diagnostics. Both the worker
//! (which emits the footer) and the orchestrator (which strips it) share
//! this definition.

/// Literal separator preceding the statistics footer
pub const STATS_SEPARATOR: &str = "==========";

/// Split captured output at the first statistics separator.
///
/// Returns the text before the separator and, when a separator is present,
/// the raw footer after it. Neither side is trimmed here; callers decide
/// how much whitespace handling their contract allows.
pub fn split_stats_footer(raw: &str) -> (&str, Option<&str>) {
    match raw.find(STATS_SEPARATOR) {
        Some(idx) => {
            let footer = &raw[idx + STATS_SEPARATOR.len()..];
            (&raw[..idx], Some(footer))
        }
        None => (raw, None),
    }
}
