//! Coordinator-only reporting
//!
//! The launcher merges the fleet's streams and the orchestrator treats
//! whatever it captures as rank-0's perspective, so only the coordinator
//! may write to stdout. Progress lines, the generated text, and the
//! statistics footer all go through here; every other rank stays silent.

use crate::runtime::Generation;
use shardchat_common::protocol::STATS_SEPARATOR;

pub struct Reporter {
    coordinator: bool,
}

impl Reporter {
    pub fn new(coordinator: bool) -> Self {
        Self { coordinator }
    }

    /// Informational progress line
    pub fn info(&self, msg: &str) {
        if self.coordinator {
            println!("[INFO] {}", msg);
        }
    }

    /// Final output block: generated text, then the statistics footer when
    /// the engine produced one
    pub fn output(&self, generation: &Generation) {
        if self.coordinator {
            print!("{}", format_output(generation));
        }
    }
}

/// Render the rank-0 output block.
pub fn format_output(generation: &Generation) -> String {
    let mut out = String::new();
    out.push_str(&generation.text);
    out.push('\n');

    if !generation.stats.is_empty() {
        out.push_str(STATS_SEPARATOR);
        out.push('\n');
        for line in &generation.stats {
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_with_stats_footer() {
        let generation = Generation {
            text: "Hello world".to_string(),
            stats: vec!["Prompt: 5 tokens".to_string(), "Peak memory: 1.2 GB".to_string()],
        };

        assert_eq!(
            format_output(&generation),
            "Hello world\n==========\nPrompt: 5 tokens\nPeak memory: 1.2 GB\n"
        );
    }

    #[test]
    fn test_output_without_stats_has_no_separator() {
        let generation = Generation {
            text: "Hello world".to_string(),
            stats: vec![],
        };

        assert_eq!(format_output(&generation), "Hello world\n");
    }

    #[test]
    fn test_non_coordinator_reporter_is_silent() {
        // must not panic; the silence itself is covered by the rank contract
        let reporter = Reporter::new(false);
        reporter.info("loading");
        reporter.output(&Generation {
            text: "x".to_string(),
            stats: vec![],
        });
    }
}
