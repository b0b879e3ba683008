//! Per-file analysis pipeline: load → lex/parse → detect.

use std::path::Path;

use vracer_common::Interner;
use vracer_detect::{detect, DetectOptions, RaceRecord};
use vracer_diagnostics::{Diagnostic, DiagnosticSink};
use vracer_ir::Design;
use vracer_parser::parse_design;
use vracer_source::{SourceDb, Span};

/// The analysis result for one successfully parsed file.
#[derive(Debug)]
pub struct FileAnalysis {
    /// The path as given on the command line.
    pub path: String,
    /// The lifted design.
    pub design: Design,
    /// The detected races, canonically sorted.
    pub records: Vec<RaceRecord>,
    /// Non-fatal diagnostics emitted while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Why a file produced no analysis.
#[derive(Debug)]
pub enum AnalyzeError {
    /// The file could not be read.
    Io {
        /// The offending path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The file failed structural parsing.
    Parse {
        /// The offending path.
        path: String,
        /// Failure position as `line:col`.
        location: String,
        /// What went wrong.
        reason: String,
    },
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzeError::Io { path, source } => write!(f, "{path}: {source}"),
            AnalyzeError::Parse {
                path,
                location,
                reason,
            } => write!(f, "{path}:{location}: {reason}"),
        }
    }
}

impl std::error::Error for AnalyzeError {}

/// Analyzes a single file.
///
/// The file is loaded into the shared [`SourceDb`] so diagnostics and parse
/// failures can be resolved to line/column coordinates.
pub fn analyze_file(
    path: &str,
    options: &DetectOptions,
    source_db: &mut SourceDb,
    interner: &Interner,
) -> Result<FileAnalysis, AnalyzeError> {
    let file = source_db
        .load_file(Path::new(path))
        .map_err(|source| AnalyzeError::Io {
            path: path.to_string(),
            source,
        })?;

    let sink = DiagnosticSink::new();
    let source = source_db.get_file(file).content.clone();
    let design = parse_design(&source, file, interner, &sink).map_err(|err| {
        let resolved = source_db.resolve_span(Span::new(file, err.offset, err.offset));
        AnalyzeError::Parse {
            path: path.to_string(),
            location: format!("{}:{}", resolved.start_line, resolved.start_col),
            reason: err.reason,
        }
    })?;

    let records = detect(&design, interner, options);

    Ok(FileAnalysis {
        path: path.to_string(),
        design,
        records,
        diagnostics: sink.take_all(),
    })
}
