//! Source file management and span tracking for VRacer diagnostics.
//!
//! This crate provides the [`SourceDb`] for loading analyzed source files,
//! [`FileId`] and [`Span`] types for tracking byte-offset locations, and
//! [`ResolvedSpan`] for converting offsets to line/column coordinates when
//! diagnostics and race reports are rendered.

#![warn(missing_docs)]

pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::Span;
