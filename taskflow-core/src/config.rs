//! Runtime configuration for taskflow.
//!
//! Resolution order: **env var > `<data_dir>/config` file > hardcoded default**.
//!
//! ```text
//! Field              Env Var                     Config Key         Default
//! ────────────────── ─────────────────────────── ────────────────── ───────────
//! data_dir           TASKFLOW_DIR                —                  ~/.taskflow
//! default_priority   TASKFLOW_DEFAULT_PRIORITY   default_priority   medium
//! log                TASKFLOW_LOG                log                warn
//! ```
//!
//! The config file holds `key=value` lines; blank lines and `#` comments are
//! skipped. Values that do not parse are ignored and the default stays.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::{env, fs};
use tracing::warn;

use crate::task::Priority;

/// Default tracing filter when neither env nor file sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// The set of recognized config file keys.
pub const KNOWN_KEYS: &[&str] = &["default_priority", "log"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the stored entries and the config file.
    pub data_dir: PathBuf,
    /// Priority given to new tasks when none is chosen.
    pub default_priority: Priority,
    /// `tracing` filter directive for the binary's log output.
    pub log: String,
}

impl Config {
    /// Load config for `data_dir` from env vars, the config file, and defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_with_env(data_dir, |k| env::var(k).ok())
    }

    fn load_with_env(data_dir: &Path, get_env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::defaults(data_dir);

        let config_file = data_dir.join("config");
        if config_file.exists() {
            parse_config_file(&config_file, |key, value| {
                if !KNOWN_KEYS.contains(&key) {
                    warn!(key, "ignoring unknown config key");
                }
                cfg.apply_file_entry(key, value);
            })?;
        }

        cfg.apply_env_overrides(get_env);
        Ok(cfg)
    }

    fn defaults(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            default_priority: Priority::Medium,
            log: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    fn apply_file_entry(&mut self, key: &str, value: &str) {
        match key {
            "default_priority" => {
                if let Ok(p) = value.parse() {
                    self.default_priority = p;
                }
            }
            "log" if !value.is_empty() => self.log = value.to_string(),
            _ => {}
        }
    }

    fn apply_env_overrides(&mut self, get_env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get_env("TASKFLOW_DEFAULT_PRIORITY") {
            if let Ok(p) = v.parse() {
                self.default_priority = p;
            }
        }
        if let Some(v) = get_env("TASKFLOW_LOG").filter(|v| !v.is_empty()) {
            self.log = v;
        }
    }
}

/// Return the default data directory (`$TASKFLOW_DIR` or `~/.taskflow`).
pub fn default_data_dir() -> PathBuf {
    data_dir_with_env(|k| env::var(k).ok())
}

fn data_dir_with_env(get_env: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = get_env("TASKFLOW_DIR").filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(home) = get_env("HOME") {
        return PathBuf::from(home).join(".taskflow");
    }
    PathBuf::from(".taskflow")
}

fn parse_config_file(path: &Path, mut f: impl FnMut(&str, &str)) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            f(k.trim(), v.trim());
        }
    }
    Ok(())
}
