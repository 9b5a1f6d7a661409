//! Launcher command construction
//!
//! Builds the command line that starts one distributed generation run. The
//! launcher executable is resolved once at startup; per-request planning
//! only appends the fixed argument tail. Resolution always degrades to a
//! best-effort command — a bad launcher surfaces at spawn time, not here.
//!
//! Invocation contract (positionally fixed):
//!
//! `<launcher> --hostfile <path> <worker-entry> --model <id> --prompt <text> --max-tokens <n>`

use shardchat_common::config::{LaunchConfig, PIPEGEN_BIN_ENV, PIPEGEN_LAUNCH_ENV};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default launcher binary name inside the runtime bin directory
const LAUNCHER_BIN: &str = "pipegen-launch";

/// A fully constructed launch command.
///
/// Built fresh per request and never mutated after construction. The
/// environment is a complete copy of the orchestrator's environment with
/// the runtime bin directory prepended to `PATH`, so the worker entry point
/// resolves the same framework installation the launcher came from.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
    pub env: HashMap<OsString, OsString>,
}

/// Resolved launcher state shared by all requests
#[derive(Debug)]
pub struct LaunchPlanner {
    /// Launcher program plus any leading arguments from an override
    launcher: Vec<String>,
    runtime_bin: PathBuf,
    shared_dir: PathBuf,
    hostfile: PathBuf,
    worker_entry: PathBuf,
    model_id: String,
}

impl LaunchPlanner {
    /// Build a planner from config, consulting the launcher environment
    /// overrides.
    pub fn from_config(cfg: &LaunchConfig, model_id: &str) -> Self {
        let launcher_override = std::env::var(PIPEGEN_LAUNCH_ENV).ok();
        let runtime_bin = std::env::var_os(PIPEGEN_BIN_ENV).map(PathBuf::from);
        Self::with_overrides(cfg, model_id, launcher_override, runtime_bin)
    }

    /// Build a planner with explicit override values (env already applied).
    pub fn with_overrides(
        cfg: &LaunchConfig,
        model_id: &str,
        launcher_override: Option<String>,
        runtime_bin: Option<PathBuf>,
    ) -> Self {
        let launcher_override = launcher_override.or_else(|| cfg.launcher_override.clone());
        let runtime_bin = runtime_bin.unwrap_or_else(|| cfg.runtime_bin.clone());
        let launcher = resolve_launcher(launcher_override.as_deref(), &runtime_bin);

        Self {
            launcher,
            runtime_bin,
            shared_dir: cfg.shared_dir.clone(),
            hostfile: cfg.hostfile.clone(),
            worker_entry: cfg.worker_entry.clone(),
            model_id: model_id.to_string(),
        }
    }

    /// Construct the launch command for one request.
    pub fn plan(&self, prompt: &str, max_tokens: u32) -> LaunchSpec {
        let mut args: Vec<OsString> = self.launcher[1..].iter().map(OsString::from).collect();
        args.push("--hostfile".into());
        args.push(self.hostfile.clone().into_os_string());
        args.push(self.worker_entry.clone().into_os_string());
        args.push("--model".into());
        args.push(self.model_id.clone().into());
        args.push("--prompt".into());
        args.push(prompt.into());
        args.push("--max-tokens".into());
        args.push(max_tokens.to_string().into());

        LaunchSpec {
            program: OsString::from(&self.launcher[0]),
            args,
            cwd: self.shared_dir.clone(),
            env: subprocess_env(&self.runtime_bin),
        }
    }

    /// Human-readable launcher command for startup logging
    pub fn describe(&self) -> String {
        self.launcher.join(" ")
    }
}

/// Resolve the launcher command.
///
/// Order: an explicit override (tokenized shell-style; unparseable input
/// degrades to a single raw token), then the default launcher inside the
/// runtime bin directory when present and executable, then the bare name
/// left to `PATH` lookup.
fn resolve_launcher(override_cmd: Option<&str>, runtime_bin: &Path) -> Vec<String> {
    if let Some(cmd) = override_cmd {
        if let Some(tokens) = shlex::split(cmd) {
            if !tokens.is_empty() {
                return tokens;
            }
        }
        return vec![cmd.to_string()];
    }

    let default = runtime_bin.join(LAUNCHER_BIN);
    if is_executable(&default) {
        return vec![default.to_string_lossy().into_owned()];
    }

    vec![LAUNCHER_BIN.to_string()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Copy of the current environment with the runtime bin directory prepended
/// to `PATH`.
fn subprocess_env(runtime_bin: &Path) -> HashMap<OsString, OsString> {
    let mut env: HashMap<OsString, OsString> = std::env::vars_os().collect();

    let mut path = runtime_bin.as_os_str().to_os_string();
    if let Some(existing) = env.get(&OsString::from("PATH")) {
        if !existing.is_empty() {
            path.push(":");
            path.push(existing);
        }
    }
    env.insert("PATH".into(), path);

    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardchat_common::config::LaunchConfig;

    fn planner(launcher_override: Option<&str>, runtime_bin: Option<PathBuf>) -> LaunchPlanner {
        let cfg = LaunchConfig {
            shared_dir: PathBuf::from("/srv/shardchat"),
            hostfile: PathBuf::from("/srv/shardchat/hosts.json"),
            worker_entry: PathBuf::from("/srv/shardchat/shardchat-worker"),
            runtime_bin: PathBuf::from("/nonexistent/pipegen/bin"),
            launcher_override: None,
        };
        LaunchPlanner::with_overrides(
            &cfg,
            "community/K2-Instruct-4bit",
            launcher_override.map(String::from),
            runtime_bin,
        )
    }

    #[test]
    fn test_override_is_tokenized_shell_style() {
        let p = planner(Some("env -u FOO mylaunch --verbose"), None);
        assert_eq!(p.describe(), "env -u FOO mylaunch --verbose");

        let spec = p.plan("hi", 16);
        assert_eq!(spec.program, OsString::from("env"));
        assert_eq!(spec.args[0], OsString::from("-u"));
        assert_eq!(spec.args[2], OsString::from("mylaunch"));
        assert_eq!(spec.args[4], OsString::from("--hostfile"));
    }

    #[test]
    fn test_unparseable_override_degrades_to_raw_token() {
        let p = planner(Some("bad 'quoting"), None);
        assert_eq!(p.describe(), "bad 'quoting");
    }

    #[test]
    fn test_default_launcher_used_when_executable() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = dir.path().join(LAUNCHER_BIN);
        std::fs::write(&launcher, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&launcher, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let p = planner(None, Some(dir.path().to_path_buf()));
        assert_eq!(p.describe(), launcher.to_string_lossy());
    }

    #[test]
    fn test_bare_name_fallback_without_default_launcher() {
        let p = planner(None, None);
        assert_eq!(p.describe(), LAUNCHER_BIN);
    }

    #[test]
    fn test_fixed_argument_tail_order() {
        let p = planner(Some("mylaunch"), None);
        let spec = p.plan("User: Hi", 10_000);

        let tail: Vec<String> = spec
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            tail,
            vec![
                "--hostfile",
                "/srv/shardchat/hosts.json",
                "/srv/shardchat/shardchat-worker",
                "--model",
                "community/K2-Instruct-4bit",
                "--prompt",
                "User: Hi",
                "--max-tokens",
                "10000",
            ]
        );
        assert_eq!(spec.cwd, PathBuf::from("/srv/shardchat"));
    }

    #[test]
    fn test_env_path_starts_with_runtime_bin() {
        let p = planner(Some("mylaunch"), Some(PathBuf::from("/opt/pipegen/bin")));
        let spec = p.plan("hi", 1);

        let path = spec.env.get(&OsString::from("PATH")).unwrap();
        let path = path.to_string_lossy();
        assert!(path.starts_with("/opt/pipegen/bin"));
        // the rest of the parent environment is carried over
        assert!(spec.env.len() >= std::env::vars_os().count());
    }
}
