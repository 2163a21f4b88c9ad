//! Shared data models: target modes, per-file outcomes and run reports.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
/// Line terminator convention a file is normalized to.
pub enum TargetMode {
    /// `\n`
    Lf,
    /// `\r\n`
    Crlf,
}

impl TargetMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetMode::Lf => "lf",
            TargetMode::Crlf => "crlf",
        }
    }
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("lf") {
            Ok(TargetMode::Lf)
        } else if t.eq_ignore_ascii_case("crlf") {
            Ok(TargetMode::Crlf)
        } else {
            Err(ConfigError::InvalidMode(t.to_string()))
        }
    }
}

impl TryFrom<String> for TargetMode {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What happened to a single file.
pub enum FileStatus {
    /// Content was rewritten.
    Changed,
    /// Already in the target mode; nothing written.
    Unchanged,
    /// Contains a NUL byte; left alone.
    Binary,
    /// Could not be read; treated as unchanged.
    Unreadable { reason: String },
    /// Conversion produced new content but persisting it failed.
    WriteFailed { reason: String },
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Changed => "changed",
            FileStatus::Unchanged => "unchanged",
            FileStatus::Binary => "binary",
            FileStatus::Unreadable { .. } => "unreadable",
            FileStatus::WriteFailed { .. } => "write_failed",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            FileStatus::Unreadable { reason } | FileStatus::WriteFailed { reason } => {
                Some(reason.as_str())
            }
            _ => None,
        }
    }

    /// Skipped without attempting a write.
    pub fn is_skipped(&self) -> bool {
        matches!(self, FileStatus::Binary | FileStatus::Unreadable { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of normalizing one file. No content is kept.
pub struct FileOutcome {
    pub path: PathBuf,
    pub mode: TargetMode,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn changed(&self) -> bool {
        self.status == FileStatus::Changed
    }

    pub fn failed(&self) -> bool {
        matches!(self.status, FileStatus::WriteFailed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Which dispatcher produced a report.
pub enum DispatchKind {
    Explicit,
    Tree,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Aggregated counts used by printers.
pub struct Summary {
    pub changed: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
/// Outcomes of one invocation, sorted by path.
pub struct Report {
    pub kind: DispatchKind,
    pub root: Option<PathBuf>,
    pub outcomes: Vec<FileOutcome>,
}

impl Report {
    pub fn new(kind: DispatchKind, root: Option<PathBuf>, mut outcomes: Vec<FileOutcome>) -> Self {
        outcomes.sort_by(|a, b| a.path.cmp(&b.path));
        Report {
            kind,
            root,
            outcomes,
        }
    }

    pub fn changed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.changed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.failed()).count()
    }

    pub fn summary(&self) -> Summary {
        let mut s = Summary {
            total: self.outcomes.len(),
            ..Summary::default()
        };
        for o in &self.outcomes {
            match o.status {
                FileStatus::Changed => s.changed += 1,
                FileStatus::Unchanged => s.unchanged += 1,
                FileStatus::WriteFailed { .. } => s.failed += 1,
                FileStatus::Binary | FileStatus::Unreadable { .. } => s.skipped += 1,
            }
        }
        s
    }
}
