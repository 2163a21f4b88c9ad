//! Configuration errors.
//!
//! Everything here is fatal and is raised before any file is touched.
//! Per-file problems are not errors; they are recorded as a
//! [`FileStatus`](crate::models::FileStatus) on the file's outcome.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid mode `{0}` (expected lf or crlf)")]
    InvalidMode(String),

    #[error("malformed map entry `{0}` (expected ext=mode)")]
    MalformedPair(String),

    #[error("empty extension in map entry `{0}`")]
    EmptyExtension(String),

    #[error("{0}")]
    Usage(String),

    #[error("root is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },
}
