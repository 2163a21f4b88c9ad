//! CLI argument parsing via `clap`.

use crate::models::TargetMode;
use crate::resolve::Invocation;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "eolnorm",
    version,
    about = "Normalize line endings (LF/CRLF) of text files in place",
    long_about = "eolnorm — rewrite line terminators of text files in place.\n\nBinary files (any NUL byte) are left untouched and files are only written when their content changes.\n\nConfiguration precedence: CLI > eolnorm.toml > defaults.",
    after_help = "Examples:\n  eolnorm --root . --map sh=lf,ps1=crlf,cmd=crlf,py=lf,md=lf\n  eolnorm --to-lf scripts/build.sh scripts/test.sh\n  eolnorm --to-crlf tools/run.cmd --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options.
pub struct Cli {
    #[arg(long, conflicts_with = "to_crlf", help = "Force LF on the listed files")]
    pub to_lf: bool,
    #[arg(long, help = "Force CRLF on the listed files")]
    pub to_crlf: bool,
    #[arg(long, value_name = "DIR", help = "Directory to normalize recursively")]
    pub root: Option<PathBuf>,
    #[arg(long, value_name = "EXT=MODE,...", help = "Extension map like 'sh=lf,ps1=crlf'")]
    pub map: Option<String>,
    #[arg(value_name = "FILE", help = "Files to normalize (with --to-lf/--to-crlf)")]
    pub files: Vec<PathBuf>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Follow symlinked files and directories under --root")]
    pub follow_symlinks: bool,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Write through a temp file and rename over the original")]
    pub atomic: bool,
    #[arg(long, help = "Worker threads (default: number of CPUs)")]
    pub jobs: Option<usize>,
    #[arg(long, short, action = clap::ArgAction::SetTrue, help = "Also report unchanged and skipped files")]
    pub verbose: bool,
    #[arg(long, value_name = "PATH", help = "Config file (default: discover eolnorm.toml|yaml)")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Dispatch-related arguments for the mode resolver.
    pub fn invocation(&self) -> Invocation {
        let mode = if self.to_lf {
            Some(TargetMode::Lf)
        } else if self.to_crlf {
            Some(TargetMode::Crlf)
        } else {
            None
        };
        Invocation {
            mode,
            files: self.files.clone(),
            root: self.root.clone(),
            map: self.map.clone(),
        }
    }
}
