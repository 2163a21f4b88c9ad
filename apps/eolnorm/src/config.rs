//! Configuration discovery and effective settings resolution.
//!
//! eolnorm reads `eolnorm.toml|yaml|yml` from the starting directory (or the
//! closest ancestor, stopping at a `.git` directory) and merges it with CLI
//! flags to produce an `Effective` config.
//! Defaults:
//! - `output`: `human`
//! - `follow_symlinks`: false
//! - `atomic`: false
//! - `jobs`: rayon default
//! - `map`: empty
//!
//! Overrides precedence: CLI > config file > defaults.
//!
//! A missing config file means defaults. A config file that exists but does
//! not parse is fatal. The `[map]` table is only validated by the resolver
//! for tree runs, so it never affects explicit `--to-lf|--to-crlf` runs.

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: [&str; 3] = ["eolnorm.toml", "eolnorm.yaml", "eolnorm.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `eolnorm.toml|yaml`.
pub struct EolConfig {
    pub output: Option<String>,
    pub follow_symlinks: Option<bool>,
    pub atomic: Option<bool>,
    pub jobs: Option<usize>,
    /// `[map]` ext -> mode; validated by the resolver in tree mode
    #[serde(default)]
    pub map: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone)]
/// Fully-resolved settings used by the binary after applying precedence.
pub struct Effective {
    pub config_path: Option<PathBuf>,
    pub output: String,
    pub follow_symlinks: bool,
    pub atomic: bool,
    pub jobs: Option<usize>,
    /// Raw `[map]` table; `--map` is layered on by the resolver
    pub map: Option<HashMap<String, String>>,
}

/// Walk upward from `start` looking for a config file.
///
/// Stops at the first directory holding `eolnorm.toml|yaml|yml`, or at a
/// directory containing `.git` (the repository boundary).
/// Relative starts (including `.`) are resolved against the working
/// directory first so the walk can climb past them.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let abs = absolute_start(start);
    let mut cur = abs.as_path();
    loop {
        for name in CONFIG_NAMES {
            let p = cur.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
        if cur.join(".git").exists() {
            return None;
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return None,
        }
    }
}

fn absolute_start(start: &Path) -> PathBuf {
    if start.is_absolute() {
        return start.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(start))
        .unwrap_or_else(|_| start.to_path_buf())
}

/// Load an `EolConfig` from `path`, choosing the parser by extension.
pub fn load_config(path: &Path) -> Result<EolConfig> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str::<EolConfig>(&s).map_err(|e| e.to_string())
    } else {
        toml::from_str::<EolConfig>(&s).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ConfigError::ConfigParse {
        path: path.to_path_buf(),
        message,
    })
}

/// Resolve `Effective` by merging CLI flags, the config file, and defaults.
///
/// `cli_config` bypasses discovery; otherwise discovery starts at `start`.
pub fn resolve_effective(
    start: &Path,
    cli_config: Option<&Path>,
    cli_output: Option<&str>,
    cli_follow_symlinks: Option<bool>,
    cli_atomic: Option<bool>,
    cli_jobs: Option<usize>,
) -> Result<Effective> {
    let config_path = match cli_config {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(start),
    };
    let cfg = match config_path.as_deref() {
        Some(p) => load_config(p)?,
        None => EolConfig::default(),
    };

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    if output != "human" && output != "json" {
        return Err(ConfigError::Usage(format!(
            "unknown output mode `{}` (expected human or json)",
            output
        )));
    }

    let follow_symlinks = cli_follow_symlinks
        .or(cfg.follow_symlinks)
        .unwrap_or(false);
    let atomic = cli_atomic.or(cfg.atomic).unwrap_or(false);
    let jobs = cli_jobs.or(cfg.jobs);
    if jobs == Some(0) {
        return Err(ConfigError::Usage("jobs must be at least 1".into()));
    }

    Ok(Effective {
        config_path,
        output,
        follow_symlinks,
        atomic,
        jobs,
        map: cfg.map,
    })
}
