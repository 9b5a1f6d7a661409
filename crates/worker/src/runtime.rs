//! Generation runtime seam
//!
//! The model engine is external: this worker reaches it only through its
//! command line (model, prompt, max-token-count) and its stdout. Loading is
//! lazy by the engine's contract — weights materialize on first use — so
//! `load` only records the model id.

use shardchat_common::config::PIPEGEN_BIN_ENV;
use shardchat_common::protocol::split_stats_footer;
use shardchat_common::{Result, ShardChatError};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Engine binary name; resolved via `PATH`, which the orchestrator prefixed
/// with the runtime bin directory for the whole process tree
pub const ENGINE_BIN: &str = "pipegen";

/// Output of one generation call
#[derive(Debug, Clone)]
pub struct Generation {
    /// Semantic text produced by the engine
    pub text: String,

    /// Statistics footer lines the engine appended, carried verbatim
    pub stats: Vec<String>,
}

/// Seam to the external generation engine
pub trait GenerationEngine {
    /// Record the model to serve. Lazy: the engine materializes weights on
    /// first generation, identically on every rank.
    fn load(&mut self, model: &str) -> Result<()>;

    /// Produce up to `max_tokens` tokens for the prompt.
    fn generate(&mut self, prompt: &str, max_tokens: u32) -> Result<Generation>;
}

/// CLI binding to the pipegen runtime
pub struct CliEngine {
    command: PathBuf,
    model: Option<String>,
}

impl CliEngine {
    /// Locate the engine: an explicit runtime bin directory wins, otherwise
    /// the bare name is left to `PATH`.
    pub fn from_env() -> Self {
        let command = match std::env::var_os(PIPEGEN_BIN_ENV) {
            Some(dir) => PathBuf::from(dir).join(ENGINE_BIN),
            None => PathBuf::from(ENGINE_BIN),
        };
        Self::with_command(command)
    }

    pub fn with_command(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            model: None,
        }
    }
}

impl GenerationEngine for CliEngine {
    fn load(&mut self, model: &str) -> Result<()> {
        debug!(model, "model recorded for lazy load");
        self.model = Some(model.to_string());
        Ok(())
    }

    fn generate(&mut self, prompt: &str, max_tokens: u32) -> Result<Generation> {
        let model = self
            .model
            .as_deref()
            .ok_or_else(|| ShardChatError::internal("generate called before load"))?;

        let output = Command::new(&self.command)
            .arg("--model")
            .arg(model)
            .arg("--prompt")
            .arg(prompt)
            .arg("--max-tokens")
            .arg(max_tokens.to_string())
            .output()
            .map_err(|e| {
                ShardChatError::launch(format!(
                    "failed to run engine {}: {}",
                    self.command.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ShardChatError::generation(stderr.into_owned()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let (text, footer) = split_stats_footer(&stdout);
        let stats = footer
            .map(|f| {
                f.lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Generation {
            text: text.trim_end().to_string(),
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn fake_engine(dir: &std::path::Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(ENGINE_BIN);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_generate_before_load_is_an_error() {
        let mut engine = CliEngine::with_command("/nonexistent/pipegen");
        assert!(engine.generate("hi", 8).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_splits_text_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_engine(
            dir.path(),
            "printf 'Hello from engine\\n==========\\nPrompt: 5 tokens\\nGeneration: 9 tokens\\nPeak memory: 1.2 GB\\n'",
        );

        let mut engine = CliEngine::with_command(path);
        engine.load("community/K2-Instruct-4bit").unwrap();
        let generation = engine.generate("User: Hi", 8).unwrap();

        assert_eq!(generation.text, "Hello from engine");
        assert_eq!(
            generation.stats,
            vec![
                "Prompt: 5 tokens",
                "Generation: 9 tokens",
                "Peak memory: 1.2 GB"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_passes_cli_contract() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_engine(dir.path(), "echo \"$@\"");

        let mut engine = CliEngine::with_command(path);
        engine.load("m1").unwrap();
        let generation = engine.generate("p1", 64).unwrap();

        assert_eq!(generation.text, "--model m1 --prompt p1 --max-tokens 64");
        assert!(generation.stats.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_failure_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_engine(dir.path(), "echo weights-missing 1>&2; exit 1");

        let mut engine = CliEngine::with_command(path);
        engine.load("m1").unwrap();
        let err = engine.generate("p1", 8).unwrap_err();

        assert_eq!(err.to_string(), "weights-missing");
    }
}
