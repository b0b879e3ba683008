//! Race report rendering (text and JSON).

use crate::analyze::FileAnalysis;
use serde::Serialize;
use vracer_detect::{RaceKind, RaceRecord};
use vracer_diagnostics::{DiagnosticRenderer, TerminalRenderer};
use vracer_source::SourceDb;

const RULE: &str = "============================================================";

/// Per-kind record counts for one file.
#[derive(Serialize)]
struct KindCounts {
    ww: usize,
    rw: usize,
    tr: usize,
}

fn counts(records: &[RaceRecord]) -> KindCounts {
    KindCounts {
        ww: records.iter().filter(|r| r.kind == RaceKind::WriteWrite).count(),
        rw: records.iter().filter(|r| r.kind == RaceKind::ReadWrite).count(),
        tr: records.iter().filter(|r| r.kind == RaceKind::Trigger).count(),
    }
}

/// Renders the human-readable report for all analyzed files.
pub fn render_text(
    analyses: &[FileAnalysis],
    source_db: &SourceDb,
    verbose: bool,
    summary: bool,
) -> String {
    let mut out = String::new();
    let mut total = 0usize;

    for analysis in analyses {
        out.push_str(&format!("\n{RULE}\nAnalyzing: {}\n{RULE}\n", analysis.path));

        if verbose {
            out.push_str(&format!(
                "\nDesign statistics:\n  Modules:    {}\n  Nets:       {}\n  Processes:  {}\n",
                analysis.design.module_count(),
                analysis.design.net_count(),
                analysis.design.process_count(),
            ));
        }

        if !analysis.diagnostics.is_empty() {
            let renderer = TerminalRenderer::new(false);
            out.push('\n');
            for diag in &analysis.diagnostics {
                out.push_str(&renderer.render(diag, source_db));
            }
        }

        total += analysis.records.len();

        if summary {
            let c = counts(&analysis.records);
            out.push_str(&format!(
                "Races found: {} (WW:{}, RW:{}, TR:{})\n",
                analysis.records.len(),
                c.ww,
                c.rw,
                c.tr
            ));
        } else if analysis.records.is_empty() {
            out.push_str("\nNo races detected.\n");
        } else {
            out.push_str(&format!("\nRaces found: {}\n", analysis.records.len()));
            for record in &analysis.records {
                out.push_str(&format!("  {record}\n"));
            }
        }
    }

    out.push_str(&format!("\n{RULE}\nTotal races: {total}\n{RULE}\n"));
    out
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a str,
    counts: KindCounts,
    races: &'a [RaceRecord],
}

/// Renders the machine-readable JSON report for all analyzed files.
pub fn render_json(analyses: &[FileAnalysis]) -> String {
    let reports: Vec<FileReport> = analyses
        .iter()
        .map(|a| FileReport {
            path: &a.path,
            counts: counts(&a.records),
            races: &a.records,
        })
        .collect();
    serde_json::to_string_pretty(&reports).unwrap_or_else(|_| "[]".to_string())
}
