//! Common result and error types for the VRacer analyzer.

/// The standard result type for fallible internal operations.
///
/// `Ok` carries the operation's value (which may be partial after error
/// recovery). `Err` indicates an analyzer bug, not a problem with the input:
/// malformed input is reported through the diagnostic sink or as a
/// `ParseError`, and the operation still returns `Ok`.
pub type VracerResult<T> = Result<T, InternalError>;

/// An internal analyzer error indicating a bug in VRacer itself.
///
/// These should never occur during normal operation; one firing means an
/// invariant of the IR or detector was violated.
#[derive(Debug, thiserror::Error)]
#[error("internal analyzer error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("anchor id out of range");
        assert_eq!(
            format!("{err}"),
            "internal analyzer error: anchor id out of range"
        );
    }

    #[test]
    fn ok_path() {
        let r: VracerResult<u32> = Ok(3);
        assert_eq!(r.ok(), Some(3));
    }
}
