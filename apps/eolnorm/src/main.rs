//! eolnorm CLI binary entry point.
//! Resolves config and invocation shape, dispatches, and prints results.

use clap::Parser;
use eolnorm::cli::Cli;
use eolnorm::dispatch::{normalize_explicit, normalize_tree, RunOptions};
use eolnorm::normalize::WriteStrategy;
use eolnorm::resolve::{resolve_invocation, Plan};
use eolnorm::utils::{error_prefix, info_prefix, note_prefix};
use eolnorm::{config, output};
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();

    // Config discovery starts at --root when given, else the working dir
    let start = cli.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let eff = match config::resolve_effective(
        &start,
        cli.config.as_deref(),
        cli.output.as_deref(),
        if cli.follow_symlinks { Some(true) } else { None },
        if cli.atomic { Some(true) } else { None },
        cli.jobs,
    ) {
        Ok(eff) => eff,
        Err(e) => {
            eprintln!("{} {}", error_prefix(), e);
            std::process::exit(2);
        }
    };
    if cli.verbose && eff.output != "json" {
        match eff.config_path.as_ref() {
            Some(p) => eprintln!("{} Using config {}", note_prefix(), p.to_string_lossy()),
            None => eprintln!("{} No eolnorm.toml found; using defaults.", note_prefix()),
        }
    }

    // Every usage/config error is reported here, before any file is touched
    let plan = match resolve_invocation(&cli.invocation(), eff.map.as_ref()) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{} {}", error_prefix(), e);
            std::process::exit(2);
        }
    };

    let opts = RunOptions {
        strategy: if eff.atomic {
            WriteStrategy::Atomic
        } else {
            WriteStrategy::InPlace
        },
        follow_symlinks: eff.follow_symlinks,
        jobs: eff.jobs,
    };
    let report = match plan {
        Plan::Explicit { mode, files } => normalize_explicit(&files, mode, &opts),
        Plan::Tree { root, map } => {
            if cli.verbose && eff.output != "json" {
                let joined = map
                    .iter()
                    .map(|(ext, mode)| format!("{}={}", ext, mode))
                    .collect::<Vec<_>>()
                    .join(", ");
                eprintln!("{} Using map: [{}]", info_prefix(), joined);
            }
            normalize_tree(&root, &map, &opts)
        }
    };

    output::print_report(&report, &eff.output, cli.verbose);
    if report.failed() > 0 {
        std::process::exit(1);
    }
}
