//! Process definitions — the concurrent unit of analysis.
//!
//! A [`Process`] is one top-level concurrent construct (`always*`, `initial`,
//! `final`) with its trigger set, anchor points, and signal references.

use crate::ids::{AnchorId, ProcessId};
use crate::reference::SignalRef;
use serde::{Deserialize, Serialize};
use vracer_common::{Ident, Interner};
use vracer_source::Span;

/// The construct that introduced a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessKind {
    /// `always` with an explicit sensitivity list (or bare `always @*`).
    AlwaysGeneral,
    /// `always_ff`.
    AlwaysFf,
    /// `always_comb`.
    AlwaysComb,
    /// `always_latch`.
    AlwaysLatch,
    /// `initial`.
    Initial,
    /// `final`.
    Final,
}

impl ProcessKind {
    /// The keyword spelling, used in synthesized labels (`c_<kind>_<n>`).
    pub fn keyword(self) -> &'static str {
        match self {
            ProcessKind::AlwaysGeneral => "always",
            ProcessKind::AlwaysFf => "always_ff",
            ProcessKind::AlwaysComb => "always_comb",
            ProcessKind::AlwaysLatch => "always_latch",
            ProcessKind::Initial => "initial",
            ProcessKind::Final => "final",
        }
    }
}

/// A sensitivity anchor — one event a process is scheduled by.
///
/// Equality is structural: `posedge clk` matches `posedge clk` only, never
/// `negedge clk` or level `clk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// `posedge <signal>`.
    EdgePos(Ident),
    /// `negedge <signal>`.
    EdgeNeg(Ident),
    /// A bare signal in the sensitivity list.
    Level(Ident),
    /// Synthesized for `always_comb`, `always_latch`, and `always @*`.
    ///
    /// Expanded to the process's read set at detector time; expanding at
    /// parse time would conflate triggers with reads.
    StarImplicit,
    /// Synthesized for `initial` and `final` processes.
    NoneInitial,
}

impl Trigger {
    /// Returns the signal this trigger watches, if any.
    pub fn signal(self) -> Option<Ident> {
        match self {
            Trigger::EdgePos(s) | Trigger::EdgeNeg(s) | Trigger::Level(s) => Some(s),
            Trigger::StarImplicit | Trigger::NoneInitial => None,
        }
    }

    /// Renders the trigger the way anchor strings spell it.
    pub fn describe(self, interner: &Interner) -> String {
        match self {
            Trigger::EdgePos(s) => format!("posedge {}", interner.resolve(s)),
            Trigger::EdgeNeg(s) => format!("negedge {}", interner.resolve(s)),
            Trigger::Level(s) => interner.resolve(s).to_string(),
            Trigger::StarImplicit => "*".to_string(),
            Trigger::NoneInitial => "initial".to_string(),
        }
    }
}

/// An execution point within a process.
///
/// Anchor 0 is the process entry; every embedded event control (`@(...)`,
/// `wait(...)`) introduces a fresh anchor. The `name` is the stable display
/// form embedded in race records, `<label>@<event>` for the entry and
/// `<label>@<event>#<k>` for the k-th embedded control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// The stable per-process anchor id.
    pub id: AnchorId,
    /// The human-readable display form.
    pub name: String,
}

/// A concurrent process within a module.
///
/// Constructed by the process parser and frozen thereafter; the reference
/// list is append-only during parse and the detector never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    /// The unique ID of this process within its module.
    pub id: ProcessId,
    /// The process label: the source block label when present, else the
    /// synthesized `c_<kind>_<ordinal>` form.
    pub label: Ident,
    /// The construct kind.
    pub kind: ProcessKind,
    /// The source span of the process keyword.
    pub span: Span,
    /// The sensitivity anchor set that schedules this process.
    pub triggers: Vec<Trigger>,
    /// All anchor points, entry first, in lexical order.
    pub anchors: Vec<Anchor>,
    /// All signal references, in lexical order.
    pub references: Vec<SignalRef>,
}

impl Process {
    /// Returns the anchor with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this process.
    pub fn anchor(&self, id: AnchorId) -> &Anchor {
        &self.anchors[id.as_raw() as usize]
    }

    /// Returns the entry anchor.
    pub fn entry_anchor(&self) -> &Anchor {
        &self.anchors[0]
    }

    /// Returns `true` if this process never runs on signal events
    /// (`initial`/`final`), excluding it from trigger-race analysis.
    pub fn is_untriggered(&self) -> bool {
        self.triggers.contains(&Trigger::NoneInitial)
    }
}
