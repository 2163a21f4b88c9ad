//! Invocation shape validation.
//!
//! Exactly one of two shapes is accepted:
//! - explicit: `--to-lf|--to-crlf` plus at least one file;
//! - tree: `--root DIR` plus an extension map (`--map`, a config `[map]`
//!   table, or both with `--map` entries winning).
//!
//! Everything is validated here, before any file is opened.

use crate::error::{ConfigError, Result};
use crate::extmap::{parse_map, ExtensionMap};
use crate::models::TargetMode;
use std::collections::HashMap;
use std::path::PathBuf;

pub const USAGE: &str =
    "provide either (--to-lf|--to-crlf) FILE... or --root DIR --map ext=mode[,ext=mode...]";

#[derive(Debug, Clone, Default)]
/// Raw dispatch-related arguments, independent of the CLI parser.
pub struct Invocation {
    pub mode: Option<TargetMode>,
    pub files: Vec<PathBuf>,
    pub root: Option<PathBuf>,
    pub map: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A validated dispatch plan.
pub enum Plan {
    Explicit {
        mode: TargetMode,
        files: Vec<PathBuf>,
    },
    Tree {
        root: PathBuf,
        map: ExtensionMap,
    },
}

/// Validate `inv` and pick a dispatcher. `cfg_map` is the raw `[map]` table
/// from the config file, if any; it is only parsed for tree runs.
pub fn resolve_invocation(
    inv: &Invocation,
    cfg_map: Option<&HashMap<String, String>>,
) -> Result<Plan> {
    let explicit = inv.mode.is_some() || !inv.files.is_empty();
    let tree = inv.root.is_some() || inv.map.is_some();

    match (explicit, tree) {
        (true, true) => Err(ConfigError::Usage(
            "--to-lf/--to-crlf cannot be combined with --root/--map".into(),
        )),
        (false, false) => Err(ConfigError::Usage(USAGE.into())),
        (true, false) => {
            let mode = inv.mode.ok_or_else(|| {
                ConfigError::Usage("files given without --to-lf or --to-crlf".into())
            })?;
            if inv.files.is_empty() {
                return Err(ConfigError::Usage(format!(
                    "--to-{} requires at least one file",
                    mode
                )));
            }
            Ok(Plan::Explicit {
                mode,
                files: inv.files.clone(),
            })
        }
        (false, true) => {
            let root = inv
                .root
                .clone()
                .ok_or_else(|| ConfigError::Usage("--map requires --root DIR".into()))?;
            let cfg_map = cfg_map.map(ExtensionMap::from_table).transpose()?;
            let cli_map = inv.map.as_deref().map(parse_map).transpose()?;
            let map = match (cfg_map, cli_map) {
                (Some(mut base), Some(over)) => {
                    base.extend(over);
                    base
                }
                (Some(base), None) => base,
                (None, Some(over)) => over,
                (None, None) => {
                    return Err(ConfigError::Usage(
                        "--root requires --map ext=mode[,...] or a [map] table in eolnorm.toml"
                            .into(),
                    ))
                }
            };
            if map.is_empty() {
                return Err(ConfigError::Usage("extension map is empty".into()));
            }
            if !root.is_dir() {
                return Err(ConfigError::RootNotDirectory(root));
            }
            Ok(Plan::Tree { root, map })
        }
    }
}
