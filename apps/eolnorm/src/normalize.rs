//! Single-file normalization.
//!
//! Read the whole file, skip binaries, convert, and write back only when
//! the bytes differ. Read failures are reported as `Unreadable` and never
//! abort a batch; write failures are reported as `WriteFailed` so a failed
//! persist is never mistaken for a skip.

use crate::eol;
use crate::models::{FileOutcome, FileStatus, TargetMode};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// How converted content is persisted.
pub enum WriteStrategy {
    /// Overwrite the original path directly. A crash mid-write can leave a
    /// torn file.
    #[default]
    InPlace,
    /// Write a sibling temp file and rename it over the original.
    Atomic,
}

/// Normalize `path` to `mode`. See module docs for the outcome rules.
pub fn normalize_file(path: &Path, mode: TargetMode, strategy: WriteStrategy) -> FileOutcome {
    let status = match fs::read(path) {
        Err(e) => FileStatus::Unreadable {
            reason: e.to_string(),
        },
        Ok(raw) if eol::is_binary(&raw) => FileStatus::Binary,
        Ok(raw) => {
            let converted = eol::convert(&raw, mode);
            if converted == raw {
                FileStatus::Unchanged
            } else {
                match persist(path, &converted, strategy) {
                    Ok(()) => FileStatus::Changed,
                    Err(e) => FileStatus::WriteFailed {
                        reason: e.to_string(),
                    },
                }
            }
        }
    };
    FileOutcome {
        path: path.to_path_buf(),
        mode,
        status,
    }
}

fn persist(path: &Path, data: &[u8], strategy: WriteStrategy) -> io::Result<()> {
    match strategy {
        WriteStrategy::InPlace => fs::write(path, data),
        WriteStrategy::Atomic => write_atomic(path, data),
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    // Rename over the real file so a symlink keeps pointing at it
    let target = fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    // Temp files are created 0600; carry over the original mode bits
    let perms = fs::metadata(&target)?.permissions();
    fs::set_permissions(tmp.path(), perms)?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}
