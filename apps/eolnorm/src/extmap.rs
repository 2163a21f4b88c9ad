//! Extension map: routes a file suffix to a target mode.
//!
//! Accepted input is `ext=mode[,ext=mode...]` on the command line, or a
//! `[map]` table in the config file. Keys are lowercased and always carry a
//! leading `.`; values are validated as soon as they are parsed.

use crate::error::{ConfigError, Result};
use crate::models::TargetMode;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Immutable lookup from normalized extension (`.sh`) to mode.
pub struct ExtensionMap {
    entries: BTreeMap<String, TargetMode>,
}

impl ExtensionMap {
    /// Build from a config table such as `{ "sh" = "lf", ".PS1" = "crlf" }`.
    pub fn from_table(table: &HashMap<String, String>) -> Result<Self> {
        let mut entries = BTreeMap::new();
        // Sorted so duplicate keys after normalization resolve deterministically
        let mut keys: Vec<&String> = table.keys().collect();
        keys.sort();
        for k in keys {
            let ext = normalize_ext(k, k)?;
            let mode: TargetMode = table[k].parse()?;
            entries.insert(ext, mode);
        }
        Ok(ExtensionMap { entries })
    }

    /// Overlay `other` on top of `self`; entries from `other` win.
    pub fn extend(&mut self, other: ExtensionMap) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, ext: &str) -> Option<TargetMode> {
        self.entries.get(ext).copied()
    }

    /// Mode for `path` by its final extension, compared lowercase.
    pub fn mode_for(&self, path: &Path) -> Option<TargetMode> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        self.get(&format!(".{}", ext))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TargetMode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Parse `ext=mode,ext=mode` into an [`ExtensionMap`].
///
/// Empty pairs from stray commas are skipped. A pair without exactly one
/// `=` fails, as does an unknown mode. Later duplicates win.
pub fn parse_map(spec: &str) -> Result<ExtensionMap> {
    let mut entries = BTreeMap::new();
    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (k, v) = match part.split_once('=') {
            Some((k, v)) if !v.contains('=') => (k, v),
            _ => return Err(ConfigError::MalformedPair(part.to_string())),
        };
        let ext = normalize_ext(k, part)?;
        let mode: TargetMode = v.parse()?;
        entries.insert(ext, mode);
    }
    Ok(ExtensionMap { entries })
}

fn normalize_ext(key: &str, pair: &str) -> Result<String> {
    let ext = key.trim().to_lowercase();
    if ext.is_empty() || ext == "." {
        return Err(ConfigError::EmptyExtension(pair.to_string()));
    }
    if ext.starts_with('.') {
        Ok(ext)
    } else {
        Ok(format!(".{}", ext))
    }
}
