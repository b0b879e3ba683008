//! `vracer` — static race hazard analysis for Verilog / Verilog-AMS.
//!
//! Analyzes each input file independently and reports Write-Write,
//! Read-Write, and Trigger hazards between concurrent processes. Exit code
//! is zero when every file analyzed successfully, regardless of whether
//! hazards were found; parse failures and unreadable inputs make it
//! non-zero.

#![warn(missing_docs)]

mod analyze;
mod report;

use std::process;

use clap::{Parser, ValueEnum};
use vracer_common::Interner;
use vracer_detect::DetectOptions;
use vracer_source::SourceDb;

/// VRacer — static race hazard analyzer for Verilog / Verilog-AMS.
#[derive(Parser, Debug)]
#[command(name = "vracer", version, about = "Detect race conditions in Verilog/Verilog-AMS designs")]
pub struct Cli {
    /// Verilog / Verilog-AMS files to analyze.
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Show per-design statistics and parser diagnostics.
    #[arg(short, long)]
    pub verbose: bool,

    /// Show only race counts.
    #[arg(long)]
    pub summary: bool,

    /// Disable write-write race detection.
    #[arg(long = "no-ww")]
    pub no_ww: bool,

    /// Disable read-write race detection.
    #[arg(long = "no-rw")]
    pub no_rw: bool,

    /// Disable trigger race detection.
    #[arg(long = "no-trigger")]
    pub no_trigger: bool,

    /// Output format for the race report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Race report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

impl Cli {
    /// Maps the disable switches onto detector options.
    pub fn detect_options(&self) -> DetectOptions {
        DetectOptions {
            enable_ww: !self.no_ww,
            enable_rw: !self.no_rw,
            enable_tr: !self.no_trigger,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let options = cli.detect_options();

    let mut source_db = SourceDb::new();
    let interner = Interner::new();

    let mut analyses = Vec::new();
    let mut failed = false;

    for path in &cli.files {
        match analyze::analyze_file(path, &options, &mut source_db, &interner) {
            Ok(analysis) => analyses.push(analysis),
            Err(err) => {
                eprintln!("error: {err}");
                failed = true;
            }
        }
    }

    match cli.format {
        ReportFormat::Text => {
            print!(
                "{}",
                report::render_text(&analyses, &source_db, cli.verbose, cli.summary)
            );
        }
        ReportFormat::Json => {
            println!("{}", report::render_json(&analyses));
        }
    }

    process::exit(if failed { 1 } else { 0 });
}
