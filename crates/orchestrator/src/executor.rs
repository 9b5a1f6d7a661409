//! External process execution
//!
//! Runs one launch command to completion and captures its full output.
//! There is deliberately no timeout and no cancellation: generation latency
//! is unbounded, a partial result is never acceptable, and closing the
//! client connection does not terminate the spawned process tree.

use crate::launch::LaunchSpec;
use shardchat_common::{Result, METRICS};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Outcome of one external run. Owned exclusively by the request that
/// spawned it.
#[derive(Debug)]
pub struct RunResult {
    /// Child exit code; -1 when the child was terminated by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run the launch command to completion.
///
/// stdout and stderr are captured separately as text, never interleaved or
/// truncated. A non-zero exit is reported through the `RunResult`, not as
/// an `Err`; only spawn/IO failures error here.
pub async fn run(spec: &LaunchSpec) -> Result<RunResult> {
    debug!(program = ?spec.program, args = spec.args.len(), "launching distributed run");
    METRICS.launch.launches_total.inc();
    let timer = METRICS.launch.run_duration.start_timer();

    let output = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(&spec.cwd)
        .env_clear()
        .envs(&spec.env)
        .stdin(Stdio::null())
        .output()
        .await?;

    timer.observe_duration();

    let result = RunResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !result.success() {
        METRICS.launch.launch_failures.inc();
    } else if result.stdout.is_empty() {
        // silence from the worker is not distinguished from an empty
        // completion; surfaced to operators only
        METRICS.launch.empty_outputs.inc();
        warn!(stderr = %result.stderr, "run exited cleanly with empty stdout");
    }

    Ok(result)
}
