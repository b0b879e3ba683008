//! Module definitions — the organizational unit of the IR.

use crate::arena::Arena;
use crate::ids::{ModuleId, NetId, ProcessId};
use crate::net::Net;
use crate::process::Process;
use serde::{Deserialize, Serialize};
use vracer_common::Ident;
use vracer_source::Span;

/// A module parameter (`parameter`/`localparam`), with its default kept as
/// source text — the analyzer never evaluates parameter expressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name.
    pub name: Ident,
    /// The default value, verbatim from source.
    pub default: String,
    /// The source span of the declaration.
    pub span: Span,
}

/// A single module of the analyzed design.
///
/// Every [`SignalRef`](crate::reference::SignalRef) inside the module's
/// processes names either a declared net or an
/// [`Unresolved`](crate::net::NetKind::Unresolved) net registered by the IR
/// builder — unresolved spellings are never dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// The unique ID of this module in the design.
    pub id: ModuleId,
    /// The module name.
    pub name: Ident,
    /// The source span of the module header.
    pub span: Span,
    /// Module parameters in declaration order.
    pub params: Vec<Parameter>,
    /// All nets known to this module, declared and unresolved.
    pub nets: Arena<NetId, Net>,
    /// The module's processes in source order.
    pub processes: Arena<ProcessId, Process>,
}

impl Module {
    /// Looks up a net by name.
    pub fn net_named(&self, name: Ident) -> Option<&Net> {
        self.nets.values().find(|n| n.name == name)
    }
}
