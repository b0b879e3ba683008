//! Conformance test helpers for the VRacer analyzer.
//!
//! Provides a shared pipeline function that runs source text through
//! lex → extract → parse → detect and returns structured results for
//! assertion in the integration suites under `tests/`.

#![warn(missing_docs)]

use vracer_common::Interner;
use vracer_detect::{detect, DetectOptions, RaceKind, RaceRecord};
use vracer_diagnostics::{Diagnostic, DiagnosticSink};
use vracer_ir::Design;
use vracer_parser::{parse_design, ParseError};
use vracer_source::FileId;

/// Result of running the full analysis pipeline on one source.
#[derive(Debug)]
pub struct AnalysisResult {
    /// The lifted design.
    pub design: Design,
    /// The detected races, canonically sorted.
    pub records: Vec<RaceRecord>,
    /// Non-fatal diagnostics emitted while parsing.
    pub diagnostics: Vec<Diagnostic>,
    /// The interner the design's names live in.
    pub interner: Interner,
}

/// Runs the full pipeline with default options.
///
/// # Panics
///
/// Panics on a fatal parse error; use [`try_analyze`] to assert on those.
pub fn analyze(source: &str) -> AnalysisResult {
    analyze_with(source, &DetectOptions::default())
}

/// Runs the full pipeline with the given detector options.
///
/// # Panics
///
/// Panics on a fatal parse error.
pub fn analyze_with(source: &str, options: &DetectOptions) -> AnalysisResult {
    try_analyze_with(source, options).unwrap_or_else(|e| panic!("fatal parse error: {e}"))
}

/// Runs the full pipeline, surfacing fatal parse errors.
pub fn try_analyze(source: &str) -> Result<AnalysisResult, ParseError> {
    try_analyze_with(source, &DetectOptions::default())
}

/// Runs the full pipeline with options, surfacing fatal parse errors.
pub fn try_analyze_with(
    source: &str,
    options: &DetectOptions,
) -> Result<AnalysisResult, ParseError> {
    let interner = Interner::new();
    let sink = DiagnosticSink::new();
    let design = parse_design(source, FileId::from_raw(0), &interner, &sink)?;
    let records = detect(&design, &interner, options);
    Ok(AnalysisResult {
        design,
        records,
        diagnostics: sink.take_all(),
        interner,
    })
}

/// Counts records of one hazard kind.
pub fn count_kind(records: &[RaceRecord], kind: RaceKind) -> usize {
    records.iter().filter(|r| r.kind == kind).count()
}
