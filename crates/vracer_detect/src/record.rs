//! Race records — the detector's value-typed output.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The hazard class of a race record.
///
/// Declaration order is the kind priority of the canonical record sort:
/// `WriteWrite < ReadWrite < Trigger`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RaceKind {
    /// Two concurrent blocking writers of the same signal.
    WriteWrite,
    /// A reader concurrent with a blocking writer of the same signal.
    ReadWrite,
    /// Overlapping triggers plus a commonly written signal.
    Trigger,
}

impl RaceKind {
    /// The two-letter code used in reports.
    pub fn code(self) -> &'static str {
        match self {
            RaceKind::WriteWrite => "WW",
            RaceKind::ReadWrite => "RW",
            RaceKind::Trigger => "TR",
        }
    }
}

impl fmt::Display for RaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One detected hazard, tied to the offending anchors and the shared signal.
///
/// For WW and RW, `target == source == the shared signal`. For TR, `target`
/// is the commonly written signal and `source` the shared trigger signal.
/// Anchor strings use the `<process-label>@<event>` convention (e.g.
/// `c_always_0@posedge clk`), so records remain meaningful without the IR.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaceRecord {
    /// The hazard class.
    pub kind: RaceKind,
    /// The hazarded signal.
    pub target: String,
    /// The shared signal (WW/RW) or shared trigger signal (TR).
    pub source: String,
    /// Anchor in the first process of the canonical pair (the reader, for RW).
    pub anchor_a: String,
    /// Anchor in the second process (the writer, for RW).
    pub anchor_b: String,
}

impl Ord for RaceRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        // Canonical record order: kind priority, then target, then anchors.
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.target.cmp(&other.target))
            .then_with(|| self.anchor_a.cmp(&other.anchor_a))
            .then_with(|| self.anchor_b.cmp(&other.anchor_b))
            .then_with(|| self.source.cmp(&other.source))
    }
}

impl PartialOrd for RaceRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RaceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] target: {}\n    source: {}\n    anchor_a: {}\n    anchor_b: {}",
            self.kind, self.target, self.source, self.anchor_a, self.anchor_b
        )
    }
}
