//! Signal references — the atomic input of the race detector.

use crate::ids::AnchorId;
use serde::{Deserialize, Serialize};
use vracer_common::Ident;
use vracer_source::Span;

/// Whether a reference reads or writes its signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefMode {
    /// The signal's value is observed.
    Read,
    /// The signal is assigned.
    Write,
}

/// The scheduling class of an assignment.
///
/// Blocking writes take effect immediately within the current timestep and
/// can race; non-blocking writes are deferred to the NBA region and are
/// ordered among themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignKind {
    /// `=`, compound ops, `++`, `--`.
    Blocking,
    /// `<=`.
    NonBlocking,
    /// Not an assignment (plain reads).
    None,
}

/// A single read or write of a signal within a process.
///
/// Two references *collide on signal* exactly when their `signal` idents
/// match — bit/part selects reduce to the base name before this point.
/// The `anchor` names the execution point at which the reference runs, so
/// race reports can say "after the k-th clock edge" rather than pointing at
/// the whole process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRef {
    /// The base name of the referenced signal.
    pub signal: Ident,
    /// Read or write.
    pub mode: RefMode,
    /// Blocking/non-blocking for writes; `None` for reads.
    pub assign: AssignKind,
    /// The anchor current at the reference's lexical position.
    pub anchor: AnchorId,
    /// The source span of the referencing token.
    pub span: Span,
}

impl SignalRef {
    /// Returns `true` if this reference is a read.
    pub fn is_read(&self) -> bool {
        self.mode == RefMode::Read
    }

    /// Returns `true` if this reference is a write of any kind.
    pub fn is_write(&self) -> bool {
        self.mode == RefMode::Write
    }

    /// Returns `true` if this reference is a blocking write.
    pub fn is_blocking_write(&self) -> bool {
        self.mode == RefMode::Write && self.assign == AssignKind::Blocking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ref(mode: RefMode, assign: AssignKind) -> SignalRef {
        SignalRef {
            signal: Ident::from_raw(0),
            mode,
            assign,
            anchor: AnchorId::ENTRY,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn read_predicates() {
        let r = make_ref(RefMode::Read, AssignKind::None);
        assert!(r.is_read());
        assert!(!r.is_write());
        assert!(!r.is_blocking_write());
    }

    #[test]
    fn blocking_write_predicates() {
        let w = make_ref(RefMode::Write, AssignKind::Blocking);
        assert!(w.is_write());
        assert!(w.is_blocking_write());
    }

    #[test]
    fn nonblocking_write_is_not_blocking() {
        let w = make_ref(RefMode::Write, AssignKind::NonBlocking);
        assert!(w.is_write());
        assert!(!w.is_blocking_write());
    }
}
