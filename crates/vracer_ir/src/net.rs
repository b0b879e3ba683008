//! Net definitions — the signals a module declares (or references).

use crate::ids::NetId;
use serde::{Deserialize, Serialize};
use vracer_common::Ident;
use vracer_source::Span;

/// The declared kind of a net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetKind {
    /// A `wire` (or a port with no storage keyword).
    Wire,
    /// A `reg` or `logic` variable.
    Reg,
    /// An `integer`/`int` variable.
    Int,
    /// A `real` variable.
    Real,
    /// A name referenced but never declared in the parsed subset.
    ///
    /// Unresolved nets are kept as opaque names and still match other
    /// references with the same spelling, which makes the analysis
    /// pessimistic rather than silently incomplete.
    Unresolved,
}

/// A net (signal) known to a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// The unique ID of this net within its module.
    pub id: NetId,
    /// The net name.
    pub name: Ident,
    /// The declared bit width, when the declaration carried a literal
    /// `[msb:lsb]` range. `None` for scalar nets and non-literal ranges.
    pub width: Option<u32>,
    /// The declared kind.
    pub kind: NetKind,
    /// The source span of the declaration (dummy for unresolved nets).
    pub span: Span,
}
