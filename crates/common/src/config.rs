//! Configuration structures for ShardChat
//!
//! This module defines the orchestrator configuration. Configuration is
//! loaded from a YAML file; the launcher-related environment overrides
//! (`PIPEGEN_LAUNCH`, `PIPEGEN_BIN`) are consulted at launch-planning time,
//! not here.

use crate::error::{Result, ShardChatError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable carrying an explicit launcher command (shell tokens)
pub const PIPEGEN_LAUNCH_ENV: &str = "PIPEGEN_LAUNCH";

/// Environment variable overriding the pipegen runtime's bin directory
pub const PIPEGEN_BIN_ENV: &str = "PIPEGEN_BIN";

/// Top-level configuration for the ShardChat orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardChatConfig {
    /// Server binding address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Model identifier passed to the launcher and echoed in responses
    pub model_id: String,

    /// Distributed-launch configuration
    #[serde(default)]
    pub launch: LaunchConfig,
}

/// Configuration for constructing the distributed launch command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Shared directory holding the hostfile and worker binary; the launcher
    /// runs with this as its working directory
    #[serde(default = "default_shared_dir")]
    pub shared_dir: PathBuf,

    /// Host-list file naming the cluster's participating machines
    #[serde(default = "default_hostfile")]
    pub hostfile: PathBuf,

    /// Worker entry-point binary the launcher starts on every node
    #[serde(default = "default_worker_entry")]
    pub worker_entry: PathBuf,

    /// Directory of the pipegen runtime installation; used to locate the
    /// default launcher and prepended to the subprocess PATH
    #[serde(default = "default_runtime_bin")]
    pub runtime_bin: PathBuf,

    /// Explicit launcher command (shell-style token list); overrides the
    /// default launcher resolution when set
    #[serde(default)]
    pub launcher_override: Option<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            shared_dir: default_shared_dir(),
            hostfile: default_hostfile(),
            worker_entry: default_worker_entry(),
            runtime_bin: default_runtime_bin(),
            launcher_override: None,
        }
    }
}

/// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_shared_dir() -> PathBuf {
    PathBuf::from("/srv/shardchat")
}

fn default_hostfile() -> PathBuf {
    PathBuf::from("/srv/shardchat/hosts.json")
}

fn default_worker_entry() -> PathBuf {
    PathBuf::from("/srv/shardchat/shardchat-worker")
}

fn default_runtime_bin() -> PathBuf {
    PathBuf::from("/opt/pipegen/bin")
}

impl ShardChatConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ShardChatError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: ShardChatConfig = serde_yaml::from_str(&content).map_err(|e| {
            ShardChatError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.model_id.trim().is_empty() {
            return Err(ShardChatError::config("model_id must not be empty"));
        }
        if self.port == 0 {
            return Err(ShardChatError::config("port must be non-zero"));
        }
        if self.launch.hostfile.as_os_str().is_empty() {
            return Err(ShardChatError::config("launch.hostfile must be set"));
        }
        if self.launch.worker_entry.as_os_str().is_empty() {
            return Err(ShardChatError::config("launch.worker_entry must be set"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_minimal_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orchestrator-config.yaml");
        std::fs::write(&path, "model_id: community/K2-Instruct-4bit\n").unwrap();

        let config = ShardChatConfig::from_file(&path).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.launch.shared_dir, PathBuf::from("/srv/shardchat"));
        assert_eq!(
            config.launch.hostfile,
            PathBuf::from("/srv/shardchat/hosts.json")
        );
        assert!(config.launch.launcher_override.is_none());
    }

    #[test]
    fn test_config_validation_empty_model() {
        let config = ShardChatConfig {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            model_id: "  ".to_string(),
            launch: LaunchConfig::default(),
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_ok() {
        let config = ShardChatConfig {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
            model_id: "community/K2-Instruct-4bit".to_string(),
            launch: LaunchConfig {
                launcher_override: Some("/usr/bin/env pipegen-launch".to_string()),
                ..LaunchConfig::default()
            },
        };

        assert!(config.validate().is_ok());
    }
}
