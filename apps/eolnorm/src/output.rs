//! Output rendering for normalization reports.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-file fields and a top-level summary.

use crate::models::{DispatchKind, FileStatus, Report};
use crate::utils::{display_path, error_prefix, use_colors, warn_prefix};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

/// Print a report in the requested format. `verbose` also lists files that
/// were left alone.
pub fn print_report(report: &Report, output: &str, verbose: bool) {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_report_json(report)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", error_prefix(), e),
        },
        _ => {
            let color = use_colors(output);
            let root = report.root.as_deref();
            for o in &report.outcomes {
                let file = display_path(&o.path, root);
                match &o.status {
                    FileStatus::Changed => {
                        if color {
                            println!(
                                "{} {} ({})",
                                "✏️  normalized:".green().bold(),
                                file.bold(),
                                o.mode
                            );
                        } else {
                            println!("✏️  normalized: {} ({})", file, o.mode);
                        }
                    }
                    FileStatus::WriteFailed { reason } => {
                        eprintln!("{} write failed: {} ({})", error_prefix(), file, reason);
                    }
                    // Listed explicitly, so a missing file is worth a warning
                    FileStatus::Unreadable { reason } if report.kind == DispatchKind::Explicit => {
                        eprintln!("{} skipped unreadable: {} ({})", warn_prefix(), file, reason);
                    }
                    status if verbose => {
                        let line = match status.reason() {
                            Some(r) => format!("{}: {} ({})", status.as_str(), file, r),
                            None => format!("{}: {}", status.as_str(), file),
                        };
                        if color {
                            println!("{}", line.bright_black());
                        } else {
                            println!("{}", line);
                        }
                    }
                    _ => {}
                }
            }
            let summary = summary_line(report);
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Final count line: the one required success output.
pub fn summary_line(report: &Report) -> String {
    let n = report.changed();
    let mut line = match (report.kind, report.root.as_deref()) {
        (DispatchKind::Tree, Some(root)) => {
            format!("Changed {} files under {}.", n, root.to_string_lossy())
        }
        _ => format!("Changed {} files.", n),
    };
    let failed = report.failed();
    if failed > 0 {
        line.push_str(&format!(" Failed to write {} files.", failed));
    }
    line
}

/// Compose report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &Report) -> JsonVal {
    let root = report.root.as_deref();
    let items: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| {
            json!({
                "file": display_path(&o.path, root),
                "mode": o.mode,
                "status": o.status.as_str(),
                "changed": o.changed(),
                "reason": o.status.reason(),
            })
        })
        .collect();
    json!({
        "kind": report.kind,
        "root": root.map(|r| r.to_string_lossy().to_string()),
        "results": items,
        "summary": report.summary(),
    })
}
