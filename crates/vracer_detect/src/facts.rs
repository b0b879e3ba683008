//! Per-process fact tables.
//!
//! The detector never walks raw reference lists during pair enumeration;
//! each process is first summarized into sorted first-anchor maps so that
//! anchor attribution and sorted-signal iteration fall out of the same
//! structure.

use std::collections::{BTreeMap, BTreeSet};
use vracer_common::Interner;
use vracer_ir::{AnchorId, Process, Trigger};

/// Summary of one process, keyed by resolved signal names.
pub struct ProcessFacts<'a> {
    /// The summarized process.
    pub process: &'a Process,
    /// The resolved process label, the pair-ordering key.
    pub label: &'a str,
    /// Signal → anchor of the lexically first read.
    pub first_reads: BTreeMap<&'a str, AnchorId>,
    /// Signal → anchor of the lexically first blocking write.
    pub first_blocking_writes: BTreeMap<&'a str, AnchorId>,
    /// All written signals, regardless of assignment kind.
    pub writes_any: BTreeSet<&'a str>,
    /// Triggers with `StarImplicit` expanded to the read set.
    pub effective_triggers: Vec<Trigger>,
    /// `true` for `initial`/`final`/free-running processes, which are
    /// excluded from trigger analysis.
    pub untriggered: bool,
}

impl<'a> ProcessFacts<'a> {
    /// Builds the fact table for one process.
    pub fn new(process: &'a Process, interner: &'a Interner) -> Self {
        let mut first_reads = BTreeMap::new();
        let mut first_blocking_writes = BTreeMap::new();
        let mut writes_any = BTreeSet::new();

        for reference in &process.references {
            let name = interner.resolve(reference.signal);
            if reference.is_read() {
                first_reads.entry(name).or_insert(reference.anchor);
            } else {
                writes_any.insert(name);
                if reference.is_blocking_write() {
                    first_blocking_writes.entry(name).or_insert(reference.anchor);
                }
            }
        }

        let untriggered = process.is_untriggered();
        let effective_triggers = expand_triggers(process, interner);

        Self {
            process,
            label: interner.resolve(process.label),
            first_reads,
            first_blocking_writes,
            writes_any,
            effective_triggers,
            untriggered,
        }
    }

    /// The display name of an anchor of this process.
    pub fn anchor_name(&self, id: AnchorId) -> String {
        self.process.anchor(id).name.clone()
    }

    /// The display name of the entry anchor.
    pub fn entry_anchor_name(&self) -> String {
        self.process.entry_anchor().name.clone()
    }
}

/// Expands `StarImplicit` to `Level` triggers over the process's read set,
/// in first-occurrence order. Explicit triggers keep their lexical order.
fn expand_triggers(process: &Process, interner: &Interner) -> Vec<Trigger> {
    let mut result = Vec::new();
    let mut has_star = false;
    for trigger in &process.triggers {
        match trigger {
            Trigger::StarImplicit => has_star = true,
            Trigger::NoneInitial => {}
            other => {
                if !result.contains(other) {
                    result.push(*other);
                }
            }
        }
    }
    if has_star {
        let mut seen = BTreeSet::new();
        for reference in &process.references {
            if reference.is_read() && seen.insert(interner.resolve(reference.signal)) {
                let level = Trigger::Level(reference.signal);
                if !result.contains(&level) {
                    result.push(level);
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use vracer_common::Ident;
    use vracer_ir::{Anchor, AssignKind, ProcessId, ProcessKind, RefMode, SignalRef};
    use vracer_source::Span;

    fn reference(signal: Ident, mode: RefMode, assign: AssignKind, anchor: u32) -> SignalRef {
        SignalRef {
            signal,
            mode,
            assign,
            anchor: AnchorId::from_raw(anchor),
            span: Span::DUMMY,
        }
    }

    fn process(
        interner: &Interner,
        label: &str,
        triggers: Vec<Trigger>,
        references: Vec<SignalRef>,
    ) -> Process {
        let n_anchors = references
            .iter()
            .map(|r| r.anchor.as_raw() + 1)
            .max()
            .unwrap_or(1);
        Process {
            id: ProcessId::from_raw(0),
            label: interner.get_or_intern(label),
            kind: ProcessKind::AlwaysGeneral,
            span: Span::DUMMY,
            triggers,
            anchors: (0..n_anchors)
                .map(|i| Anchor {
                    id: AnchorId::from_raw(i),
                    name: format!("{label}@a{i}"),
                })
                .collect(),
            references,
        }
    }

    #[test]
    fn first_anchor_wins() {
        let interner = Interner::new();
        let x = interner.get_or_intern("x");
        let p = process(
            &interner,
            "p",
            vec![Trigger::EdgePos(interner.get_or_intern("clk"))],
            vec![
                reference(x, RefMode::Write, AssignKind::Blocking, 0),
                reference(x, RefMode::Write, AssignKind::Blocking, 1),
                reference(x, RefMode::Read, AssignKind::None, 1),
            ],
        );
        let facts = ProcessFacts::new(&p, &interner);
        assert_eq!(facts.first_blocking_writes["x"], AnchorId::from_raw(0));
        assert_eq!(facts.first_reads["x"], AnchorId::from_raw(1));
    }

    #[test]
    fn nonblocking_writes_counted_as_writes_any_only() {
        let interner = Interner::new();
        let q = interner.get_or_intern("q");
        let p = process(
            &interner,
            "p",
            vec![Trigger::EdgePos(interner.get_or_intern("clk"))],
            vec![reference(q, RefMode::Write, AssignKind::NonBlocking, 0)],
        );
        let facts = ProcessFacts::new(&p, &interner);
        assert!(facts.writes_any.contains("q"));
        assert!(facts.first_blocking_writes.is_empty());
    }

    #[test]
    fn star_expands_to_read_set_in_occurrence_order() {
        let interner = Interner::new();
        let b = interner.get_or_intern("b");
        let a = interner.get_or_intern("a");
        let y = interner.get_or_intern("y");
        let p = process(
            &interner,
            "p",
            vec![Trigger::StarImplicit],
            vec![
                reference(b, RefMode::Read, AssignKind::None, 0),
                reference(a, RefMode::Read, AssignKind::None, 0),
                reference(y, RefMode::Write, AssignKind::Blocking, 0),
            ],
        );
        let facts = ProcessFacts::new(&p, &interner);
        assert_eq!(
            facts.effective_triggers,
            vec![Trigger::Level(b), Trigger::Level(a)]
        );
    }

    #[test]
    fn initial_is_untriggered_with_no_effective_triggers() {
        let interner = Interner::new();
        let x = interner.get_or_intern("x");
        let mut p = process(
            &interner,
            "p",
            vec![Trigger::NoneInitial],
            vec![reference(x, RefMode::Read, AssignKind::None, 0)],
        );
        p.kind = ProcessKind::Initial;
        let facts = ProcessFacts::new(&p, &interner);
        assert!(facts.untriggered);
        assert!(facts.effective_triggers.is_empty());
    }

    #[test]
    fn explicit_triggers_keep_lexical_order() {
        let interner = Interner::new();
        let clk = interner.get_or_intern("clk");
        let rst = interner.get_or_intern("rst");
        let p = process(
            &interner,
            "p",
            vec![Trigger::EdgePos(clk), Trigger::EdgeNeg(rst)],
            vec![],
        );
        let facts = ProcessFacts::new(&p, &interner);
        assert_eq!(
            facts.effective_triggers,
            vec![Trigger::EdgePos(clk), Trigger::EdgeNeg(rst)]
        );
    }
}
