//! Console helpers: colored diagnostic prefixes and path display.

use owo_colors::OwoColorize;
use std::path::Path;

/// Colors are used for human output unless `NO_COLOR` is set.
pub fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn prefix(label: &str, paint: fn(&str) -> String) -> String {
    if std::env::var_os("NO_COLOR").is_some() {
        label.to_string()
    } else {
        paint(label)
    }
}

pub fn error_prefix() -> String {
    prefix("error:", |s| s.red().bold().to_string())
}

pub fn warn_prefix() -> String {
    prefix("warn:", |s| s.yellow().bold().to_string())
}

pub fn note_prefix() -> String {
    prefix("note:", |s| s.cyan().bold().to_string())
}

pub fn info_prefix() -> String {
    prefix("info:", |s| s.blue().bold().to_string())
}

/// `path` relative to `root` when possible, for shorter tree-mode output.
pub fn display_path(path: &Path, root: Option<&Path>) -> String {
    root.and_then(|r| pathdiff::diff_paths(path, r))
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}
