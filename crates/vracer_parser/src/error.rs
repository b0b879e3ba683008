//! Fatal parse errors.

/// A structural parse failure that aborts analysis of one file.
///
/// Raised for unbalanced `module`/`endmodule` nesting, unbalanced
/// `begin`/`end` inside a process body, and malformed sensitivity lists.
/// Carries the byte offset of the failure so the driver can cite it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at byte {offset}: {reason}")]
pub struct ParseError {
    /// What went wrong.
    pub reason: String,
    /// Byte offset into the source file.
    pub offset: u32,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(reason: impl Into<String>, offset: u32) -> Self {
        Self {
            reason: reason.into(),
            offset,
        }
    }
}
