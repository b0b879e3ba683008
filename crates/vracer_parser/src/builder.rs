//! IR builder.
//!
//! Assembles extracted module blocks and parsed processes into a
//! [`Design`], assigning stable process labels and composing anchor display
//! names. Labels are the source block label when present, else
//! `c_<kind>_<ordinal>` with the ordinal counting constructs of that kind in
//! source order — reparsing the same source always yields the same labels.
//!
//! Names referenced but never declared are registered as
//! [`Unresolved`](NetKind::Unresolved) nets and noted in the diagnostics;
//! they still participate in hazard matching by spelling.

use crate::error::ParseError;
use crate::extract::{extract_modules, ModuleBlock};
use crate::lexer::lex;
use crate::process::parse_process;
use crate::token::Token;
use std::collections::{HashMap, HashSet};
use vracer_common::{Ident, Interner};
use vracer_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use vracer_ir::{
    Anchor, AnchorId, Design, Module, ModuleId, Net, NetId, NetKind, Parameter, Process,
    ProcessId, ProcessKind,
};
use vracer_source::{FileId, Span};

/// Parses one source file into a [`Design`].
///
/// Non-fatal problems (unsupported constructs, unresolved names) are emitted
/// to the sink; the returned design covers everything that parsed. A fatal
/// [`ParseError`] means the file produced no design at all.
pub fn parse_design(
    source: &str,
    file: FileId,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Result<Design, ParseError> {
    let tokens = lex(source, file, sink);
    let blocks = extract_modules(&tokens, source, interner, sink)?;

    let mut design = Design::new();
    for block in blocks {
        let id = ModuleId::from_raw(design.modules.len() as u32);
        let module = build_module(id, block, &tokens, source, interner, sink)?;
        design.modules.alloc(module);
    }
    Ok(design)
}

fn build_module(
    id: ModuleId,
    block: ModuleBlock,
    tokens: &[Token],
    source: &str,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Result<Module, ParseError> {
    let mut module = Module {
        id,
        name: block.name,
        span: block.span,
        params: Vec::new(),
        nets: vracer_ir::Arena::new(),
        processes: vracer_ir::Arena::new(),
    };

    for param in block.params {
        module.params.push(Parameter {
            name: param.name,
            default: param.default,
            span: param.span,
        });
    }

    let mut net_ids: HashMap<Ident, NetId> = HashMap::new();
    for decl in block.nets {
        declare_net(&mut module, &mut net_ids, decl.name, decl.width, decl.kind, decl.span);
    }

    let mut kind_counts: HashMap<ProcessKind, u32> = HashMap::new();
    for construct in block.processes {
        let parsed = parse_process(tokens, construct.tokens, source, interner, sink)?;

        let ordinal = kind_counts.entry(parsed.kind).or_insert(0);
        let label_text = match parsed.label {
            Some(l) => interner.resolve(l).to_string(),
            None => format!("c_{}_{}", parsed.kind.keyword(), ordinal),
        };
        *ordinal += 1;
        let label = interner.get_or_intern(&label_text);

        let mut anchors = Vec::with_capacity(1 + parsed.embedded_events.len());
        anchors.push(Anchor {
            id: AnchorId::ENTRY,
            name: format!("{label_text}@{}", parsed.entry_event),
        });
        for (idx, event) in parsed.embedded_events.iter().enumerate() {
            anchors.push(Anchor {
                id: AnchorId::from_raw(idx as u32 + 1),
                name: format!("{label_text}@{event}#{}", idx + 1),
            });
        }

        for (name, kind) in &parsed.locals {
            declare_net(&mut module, &mut net_ids, *name, None, *kind, Span::DUMMY);
        }

        let process = Process {
            id: ProcessId::from_raw(module.processes.len() as u32),
            label,
            kind: parsed.kind,
            span: parsed.span,
            triggers: parsed.triggers,
            anchors,
            references: parsed.references,
        };
        module.processes.alloc(process);
    }

    register_unresolved(&mut module, &mut net_ids, interner, sink);

    Ok(module)
}

fn declare_net(
    module: &mut Module,
    net_ids: &mut HashMap<Ident, NetId>,
    name: Ident,
    width: Option<u32>,
    kind: NetKind,
    span: Span,
) {
    if net_ids.contains_key(&name) {
        // First declaration wins; redeclarations are tolerated.
        return;
    }
    let id = NetId::from_raw(module.nets.len() as u32);
    let net_id = module.nets.alloc(Net {
        id,
        name,
        width,
        kind,
        span,
    });
    net_ids.insert(name, net_id);
}

/// Registers every referenced-but-undeclared name as an unresolved net and
/// notes it once per spelling.
fn register_unresolved(
    module: &mut Module,
    net_ids: &mut HashMap<Ident, NetId>,
    interner: &Interner,
    sink: &DiagnosticSink,
) {
    let mut pending: Vec<(Ident, Span)> = Vec::new();
    let mut seen: HashSet<Ident> = HashSet::new();

    for process in module.processes.values() {
        for reference in &process.references {
            if !net_ids.contains_key(&reference.signal) && seen.insert(reference.signal) {
                pending.push((reference.signal, reference.span));
            }
        }
        for trigger in &process.triggers {
            if let Some(sig) = trigger.signal() {
                if !net_ids.contains_key(&sig) && seen.insert(sig) {
                    pending.push((sig, Span::DUMMY));
                }
            }
        }
    }

    for (name, span) in pending {
        declare_net(module, net_ids, name, None, NetKind::Unresolved, Span::DUMMY);
        sink.emit(
            Diagnostic::note(
                DiagnosticCode::new(Category::Warning, 202),
                format!(
                    "identifier '{}' is not declared; treated as an external net",
                    interner.resolve(name)
                ),
                span,
            )
            .with_note("unresolved names still participate in hazard matching by spelling"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vracer_ir::Trigger;

    fn parse(source: &str) -> (Design, Interner, DiagnosticSink) {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let design = parse_design(source, FileId::from_raw(0), &interner, &sink)
            .unwrap_or_else(|e| panic!("unexpected fatal error: {e}"));
        (design, interner, sink)
    }

    fn labels(design: &Design, interner: &Interner) -> Vec<String> {
        design
            .modules
            .values()
            .flat_map(|m| m.processes.values())
            .map(|p| interner.resolve(p.label).to_string())
            .collect()
    }

    #[test]
    fn synthesized_labels_count_per_kind() {
        let (design, interner, _) = parse(
            "module m;\n\
             initial x = 0;\n\
             always @(posedge clk) a = 1;\n\
             always @(posedge clk) b = 1;\n\
             initial y = 0;\n\
             endmodule",
        );
        assert_eq!(
            labels(&design, &interner),
            vec!["c_initial_0", "c_always_0", "c_always_1", "c_initial_1"]
        );
    }

    #[test]
    fn source_label_preferred() {
        let (design, interner, _) = parse(
            "module m; always @(posedge clk) begin : counter1 count1++; end endmodule",
        );
        assert_eq!(labels(&design, &interner), vec!["counter1"]);
    }

    #[test]
    fn labels_stable_across_reparse() {
        let src = "module m;\ninitial a = 1;\nalways @(x) b = 2;\nendmodule";
        let (d1, i1, _) = parse(src);
        let (d2, i2, _) = parse(src);
        assert_eq!(labels(&d1, &i1), labels(&d2, &i2));
    }

    #[test]
    fn entry_anchor_named_after_label_and_trigger() {
        let (design, _, _) = parse(
            "module m; always @(posedge clk) count = count + 1; endmodule",
        );
        let module = design.modules.values().next().unwrap();
        let process = module.processes.values().next().unwrap();
        assert_eq!(process.entry_anchor().name, "c_always_0@posedge clk");
    }

    #[test]
    fn embedded_anchors_numbered() {
        let (design, _, _) = parse(
            "module m; initial begin a = 1; @(posedge clk) b = 2; @(negedge clk) c = 3; end endmodule",
        );
        let module = design.modules.values().next().unwrap();
        let process = module.processes.values().next().unwrap();
        let names: Vec<&str> = process.anchors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "c_initial_0@initial",
                "c_initial_0@posedge clk#1",
                "c_initial_0@negedge clk#2",
            ]
        );
    }

    #[test]
    fn anchor_validity_invariant() {
        let (design, _, _) = parse(
            "module m; initial begin x = 1; @(posedge clk) y = 2; wait (go) z = 3; end endmodule",
        );
        for module in design.modules.values() {
            for process in module.processes.values() {
                for reference in &process.references {
                    assert!(
                        (reference.anchor.as_raw() as usize) < process.anchors.len(),
                        "reference anchor out of range"
                    );
                }
            }
        }
    }

    #[test]
    fn unresolved_names_registered_and_noted() {
        let (design, interner, sink) = parse(
            "module m; always @(posedge clk) count = count + 1; endmodule",
        );
        let module = design.modules.values().next().unwrap();
        // Neither clk nor count is declared.
        let clk = interner.get_or_intern("clk");
        let count = interner.get_or_intern("count");
        assert_eq!(module.net_named(clk).unwrap().kind, NetKind::Unresolved);
        assert_eq!(module.net_named(count).unwrap().kind, NetKind::Unresolved);
        let notes: Vec<_> = sink
            .diagnostics()
            .into_iter()
            .filter(|d| d.message.contains("not declared"))
            .collect();
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn declared_names_not_noted() {
        let (_, _, sink) = parse(
            "module m (input clk); reg count;\nalways @(posedge clk) count = count + 1; endmodule",
        );
        assert!(sink
            .diagnostics()
            .iter()
            .all(|d| !d.message.contains("not declared")));
    }

    #[test]
    fn locals_become_module_nets() {
        let (design, interner, _) = parse(
            "module m; initial begin integer i; i = 3; end endmodule",
        );
        let module = design.modules.values().next().unwrap();
        let i = interner.get_or_intern("i");
        assert_eq!(module.net_named(i).unwrap().kind, NetKind::Int);
    }

    #[test]
    fn fatal_error_produces_no_design() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let result = parse_design(
            "module m; always @(posedge clk) begin x = 1;",
            FileId::from_raw(0),
            &interner,
            &sink,
        );
        assert!(result.is_err());
    }

    #[test]
    fn multiple_modules_in_one_file() {
        let (design, interner, _) = parse(
            "module a; initial x = 1; endmodule\nmodule b; initial y = 1; endmodule",
        );
        assert_eq!(design.module_count(), 2);
        let names: Vec<&str> = design
            .modules
            .values()
            .map(|m| interner.resolve(m.name))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn always_comb_trigger_is_star() {
        let (design, _, _) = parse("module m; always_comb y = a & b; endmodule");
        let module = design.modules.values().next().unwrap();
        let process = module.processes.values().next().unwrap();
        assert_eq!(process.triggers, vec![Trigger::StarImplicit]);
        assert_eq!(process.entry_anchor().name, "c_always_comb_0@*");
    }
}
