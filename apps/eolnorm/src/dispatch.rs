//! Dispatchers: route files to the normalizer.
//!
//! - `normalize_tree` walks a directory and picks each file's mode from the
//!   extension map. Files with an unmapped extension are never opened.
//! - `normalize_explicit` applies one mode to a caller-supplied list.
//!
//! Files are independent, so both fan out over a rayon pool and reduce the
//! outcomes afterwards. Paths naming the same file (repeated arguments,
//! hard links, symlinks to one target) are collapsed to their first
//! occurrence before the fan-out, so each file is written by one worker
//! and counted once. Results are sorted by path for stable output.

use crate::extmap::ExtensionMap;
use crate::models::{DispatchKind, FileOutcome, Report, TargetMode};
use crate::normalize::{normalize_file, WriteStrategy};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
/// Knobs shared by both dispatchers.
pub struct RunOptions {
    pub strategy: WriteStrategy,
    /// Descend into symlinked directories and normalize symlinked files.
    /// When false, symlinks under the root are ignored entirely.
    pub follow_symlinks: bool,
    /// Worker threads; `None` uses rayon's default.
    pub jobs: Option<usize>,
}

/// Normalize every mapped regular file under `root`.
pub fn normalize_tree(root: &Path, map: &ExtensionMap, opts: &RunOptions) -> Report {
    let targets = dedup_by_file(collect_targets(root, map, opts.follow_symlinks), |(p, _)| p);
    let outcomes = run_pool(opts.jobs, || {
        targets
            .par_iter()
            .map(|(path, mode)| normalize_file(path, *mode, opts.strategy))
            .collect::<Vec<FileOutcome>>()
    });
    Report::new(DispatchKind::Tree, Some(root.to_path_buf()), outcomes)
}

/// Normalize each listed file to `mode`, ignoring extensions.
pub fn normalize_explicit(paths: &[PathBuf], mode: TargetMode, opts: &RunOptions) -> Report {
    let paths = dedup_by_file(paths.to_vec(), |p| p);
    let outcomes = run_pool(opts.jobs, || {
        paths
            .par_iter()
            .map(|p| normalize_file(p, mode, opts.strategy))
            .collect::<Vec<FileOutcome>>()
    });
    Report::new(DispatchKind::Explicit, None, outcomes)
}

/// Walk `root` and pair each mapped regular file with its mode.
fn collect_targets(
    root: &Path,
    map: &ExtensionMap,
    follow_symlinks: bool,
) -> Vec<(PathBuf, TargetMode)> {
    let mut targets = Vec::new();
    for entry in WalkDir::new(root).follow_links(follow_symlinks) {
        // Unreadable directories and symlink loops are skipped
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(mode) = map.mode_for(entry.path()) {
            targets.push((entry.into_path(), mode));
        }
    }
    targets
}

#[derive(Debug, PartialEq, Eq, Hash)]
/// Identity of the file a path resolves to.
enum FileKey {
    #[cfg(unix)]
    Inode(u64, u64),
    Canonical(PathBuf),
    /// Unresolvable (e.g. missing); only identical spellings collapse
    Raw(PathBuf),
}

fn file_key(path: &Path) -> FileKey {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if let Ok(meta) = fs::metadata(path) {
            return FileKey::Inode(meta.dev(), meta.ino());
        }
    }
    match fs::canonicalize(path) {
        Ok(p) => FileKey::Canonical(p),
        Err(_) => FileKey::Raw(path.to_path_buf()),
    }
}

/// Keep the first item for each distinct underlying file, preserving order.
fn dedup_by_file<T>(items: Vec<T>, path_of: impl Fn(&T) -> &PathBuf) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(file_key(path_of(item))))
        .collect()
}

fn run_pool<T, F>(jobs: Option<usize>, f: F) -> T
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    let pool = jobs.and_then(|n| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n.max(1))
            .build()
            .ok()
    });
    match pool {
        Some(pool) => pool.install(f),
        None => f(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extmap::parse_map;
    use crate::models::FileStatus;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_tree_routes_by_extension() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("script.sh"), b"echo hi\r\n").unwrap();
        fs::write(root.join("run.cmd"), b"echo hi\n").unwrap();
        let map = parse_map("sh=lf,cmd=crlf").unwrap();
        let report = normalize_tree(root, &map, &RunOptions::default());
        assert_eq!(report.changed(), 2);
        assert_eq!(fs::read(root.join("script.sh")).unwrap(), b"echo hi\n");
        assert_eq!(fs::read(root.join("run.cmd")).unwrap(), b"echo hi\r\n");
        assert_eq!(report.kind, DispatchKind::Tree);
        assert_eq!(report.root.as_deref(), Some(root));
    }

    #[test]
    fn test_normalize_tree_recurses_and_skips_unmapped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/deep.SH"), b"x\r\n").unwrap();
        fs::write(root.join("a/notes.txt"), b"keep\r\n").unwrap();
        fs::write(root.join("Makefile"), b"all:\r\n").unwrap();
        let map = parse_map("sh=lf").unwrap();
        let report = normalize_tree(root, &map, &RunOptions::default());
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.changed(), 1);
        assert_eq!(fs::read(root.join("a/b/deep.SH")).unwrap(), b"x\n");
        assert_eq!(fs::read(root.join("a/notes.txt")).unwrap(), b"keep\r\n");
        assert_eq!(fs::read(root.join("Makefile")).unwrap(), b"all:\r\n");
    }

    #[test]
    fn test_normalize_tree_never_treats_directories_as_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("looks_like.sh")).unwrap();
        fs::write(root.join("looks_like.sh/inner.sh"), b"a\r\n").unwrap();
        let map = parse_map("sh=lf").unwrap();
        let report = normalize_tree(root, &map, &RunOptions::default());
        assert_eq!(report.outcomes.len(), 1);
        assert!(report.outcomes[0].path.ends_with("inner.sh"));
    }

    #[test]
    fn test_normalize_tree_skips_binary_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("blob.sh"), b"x\x00y\r\n").unwrap();
        fs::write(root.join("ok.sh"), b"a\rb\r\n").unwrap();
        let map = parse_map("sh=lf").unwrap();
        let first = normalize_tree(root, &map, &RunOptions::default());
        assert_eq!(first.changed(), 1);
        assert_eq!(first.summary().skipped, 1);
        let second = normalize_tree(root, &map, &RunOptions::default());
        assert_eq!(second.changed(), 0);
        assert_eq!(fs::read(root.join("blob.sh")).unwrap(), b"x\x00y\r\n");
    }

    #[test]
    fn test_normalize_explicit_ignores_extension_and_missing_files() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.weird");
        let b = dir.path().join("b");
        fs::write(&a, b"1\n2\n").unwrap();
        fs::write(&b, b"1\r\n").unwrap();
        let missing = dir.path().join("missing.txt");
        let paths = vec![missing.clone(), b.clone(), a.clone()];
        let opts = RunOptions {
            jobs: Some(1),
            ..RunOptions::default()
        };
        let report = normalize_explicit(&paths, TargetMode::Crlf, &opts);
        assert_eq!(report.changed(), 1);
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(fs::read(&a).unwrap(), b"1\r\n2\r\n");
        assert_eq!(fs::read(&b).unwrap(), b"1\r\n");
        let miss = report.outcomes.iter().find(|o| o.path == missing).unwrap();
        assert!(matches!(miss.status, FileStatus::Unreadable { .. }));
    }

    #[test]
    fn test_normalize_explicit_order_does_not_matter() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, b"x\r\n").unwrap();
        fs::write(&b, b"y\r").unwrap();
        let r1 = normalize_explicit(&[b.clone(), a.clone()], TargetMode::Lf, &RunOptions::default());
        fs::write(&a, b"x\r\n").unwrap();
        fs::write(&b, b"y\r").unwrap();
        let r2 = normalize_explicit(&[a.clone(), b.clone()], TargetMode::Lf, &RunOptions::default());
        assert_eq!(r1.outcomes, r2.outcomes);
    }

    #[test]
    fn test_normalize_explicit_counts_repeated_path_once() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("big.txt");
        fs::write(&p, "line\n".repeat(200_000)).unwrap();
        let same_spelled_differently = dir.path().join(".").join("big.txt");
        let mut paths = vec![p.clone(); 16];
        paths.push(same_spelled_differently);
        let opts = RunOptions {
            jobs: Some(8),
            ..RunOptions::default()
        };
        let report = normalize_explicit(&paths, TargetMode::Crlf, &opts);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.changed(), 1);
        assert_eq!(fs::read(&p).unwrap(), "line\r\n".repeat(200_000).into_bytes());
    }

    #[test]
    fn test_normalize_explicit_keeps_distinct_missing_paths() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let report = normalize_explicit(&[a.clone(), b, a], TargetMode::Lf, &RunOptions::default());
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.changed(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_tree_counts_aliased_files_once() {
        use std::os::unix::fs::symlink;
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.sh"), b"x\r\n").unwrap();
        fs::hard_link(root.join("a.sh"), root.join("b.sh")).unwrap();
        symlink(root.join("a.sh"), root.join("c.sh")).unwrap();
        let map = parse_map("sh=lf").unwrap();
        let opts = RunOptions {
            follow_symlinks: true,
            jobs: Some(4),
            ..RunOptions::default()
        };
        let report = normalize_tree(root, &map, &opts);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.changed(), 1);
        assert_eq!(fs::read(root.join("b.sh")).unwrap(), b"x\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_followed_symlink_with_atomic_write_keeps_link() {
        use std::os::unix::fs::symlink;
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("target.sh"), b"t\r\n").unwrap();
        let dir = tempdir().unwrap();
        let root = dir.path();
        symlink(outside.path().join("target.sh"), root.join("link.sh")).unwrap();
        let map = parse_map("sh=lf").unwrap();
        let opts = RunOptions {
            follow_symlinks: true,
            strategy: WriteStrategy::Atomic,
            ..RunOptions::default()
        };
        let report = normalize_tree(root, &map, &opts);
        assert_eq!(report.changed(), 1);
        assert!(fs::symlink_metadata(root.join("link.sh"))
            .unwrap()
            .file_type()
            .is_symlink());
        assert_eq!(fs::read(outside.path().join("target.sh")).unwrap(), b"t\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_ignored_unless_followed() {
        use std::os::unix::fs::symlink;
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("target.sh"), b"t\r\n").unwrap();
        fs::create_dir_all(outside.path().join("sub")).unwrap();
        fs::write(outside.path().join("sub/inner.sh"), b"i\r\n").unwrap();

        let dir = tempdir().unwrap();
        let root = dir.path();
        symlink(outside.path().join("target.sh"), root.join("link.sh")).unwrap();
        symlink(outside.path().join("sub"), root.join("linkdir")).unwrap();
        let map = parse_map("sh=lf").unwrap();

        let report = normalize_tree(root, &map, &RunOptions::default());
        assert_eq!(report.outcomes.len(), 0);
        assert_eq!(fs::read(outside.path().join("target.sh")).unwrap(), b"t\r\n");

        let opts = RunOptions {
            follow_symlinks: true,
            ..RunOptions::default()
        };
        let report = normalize_tree(root, &map, &opts);
        assert_eq!(report.changed(), 2);
        assert_eq!(fs::read(outside.path().join("target.sh")).unwrap(), b"t\n");
        assert_eq!(fs::read(outside.path().join("sub/inner.sh")).unwrap(), b"i\n");
    }
}
