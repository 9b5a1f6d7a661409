//! Output normalization
//!
//! Strips the engine's statistics footer from captured rank-0 stdout.
//! Model-authored content is never mutated beyond removing that footer:
//! when no separator is present the stream passes through byte-for-byte.

use shardchat_common::protocol::split_stats_footer;

/// Produce the final response content from raw captured stdout.
pub fn normalize(raw: &str) -> String {
    match split_stats_footer(raw) {
        (text, Some(_)) => text.trim().to_string(),
        (text, None) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_is_stripped_and_text_trimmed() {
        let raw = "Hello world\n==========\nPrompt: 5 tokens\n";
        assert_eq!(normalize(raw), "Hello world");
    }

    #[test]
    fn test_no_separator_passes_through_unchanged() {
        let raw = "  raw output with whitespace \n";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn test_only_first_separator_counts() {
        let raw = "before\n==========\nmiddle\n==========\nafter";
        assert_eq!(normalize(raw), "before");
    }

    #[test]
    fn test_empty_stdout_stays_empty() {
        assert_eq!(normalize(""), "");
    }
}
