//! eolnorm core library.
//!
//! This crate exposes programmatic APIs for normalizing line endings of
//! text files in place, either for an explicit list of files or for a whole
//! directory tree routed by file extension.
//!
//! High-level modules:
//! - `eol`: Binary heuristic and the byte-level terminator conversion.
//! - `extmap`: Extension map parsing (`sh=lf,ps1=crlf`) and lookup.
//! - `normalize`: Single-file read/convert/conditional-write.
//! - `dispatch`: Tree walk and explicit-list dispatchers.
//! - `resolve`: Invocation shape validation (explicit vs. tree).
//! - `config`: Discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `models`: Target modes, per-file outcomes and reports.
//! - `output`: Human/JSON printers.
//! - `error`: Fatal configuration errors.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod eol;
pub mod error;
pub mod extmap;
pub mod models;
pub mod normalize;
pub mod output;
pub mod resolve;
pub mod utils;
