//! Quantified invariants of the analyzer, checked end-to-end.

use vracer_conformance::{analyze, analyze_with, count_kind, try_analyze};
use vracer_detect::{detect, DetectOptions, RaceKind};

const MIXED_FIXTURE: &str = r#"
module fixture (input clk, input rst);
  reg [7:0] a, b, c;

  always @(posedge clk) begin : alpha
    a = a + 1;
    b <= b + 1;
  end

  always @(posedge clk or negedge rst) begin : beta
    a = 0;
    c = a;
  end

  initial begin : boot
    a = 0;
    @(posedge clk) c = 1;
  end

  always_comb begin : mix
    b = a ^ c;
  end
endmodule
"#;

#[test]
fn determinism_byte_identical_across_invocations() {
    let first = analyze(MIXED_FIXTURE);
    let second = analyze(MIXED_FIXTURE);
    let a = serde_json::to_string(&first.records).unwrap();
    let b = serde_json::to_string(&second.records).unwrap();
    assert_eq!(a, b);
}

#[test]
fn detector_is_idempotent_over_the_ir() {
    let result = analyze(MIXED_FIXTURE);
    let again = detect(&result.design, &result.interner, &DetectOptions::default());
    assert_eq!(result.records, again);
}

#[test]
fn no_two_records_share_a_five_tuple() {
    let result = analyze(MIXED_FIXTURE);
    for (i, a) in result.records.iter().enumerate() {
        for b in &result.records[i + 1..] {
            assert_ne!(a, b, "duplicate record: {a:?}");
        }
    }
}

#[test]
fn records_are_canonically_sorted() {
    let result = analyze(MIXED_FIXTURE);
    let mut sorted = result.records.clone();
    sorted.sort();
    assert_eq!(result.records, sorted);
}

#[test]
fn ww_and_tr_anchors_ordered_by_label() {
    // For WW and TR the pair is normalized by label lex order, and the
    // anchor strings lead with the label.
    let result = analyze(MIXED_FIXTURE);
    for record in &result.records {
        if record.kind == RaceKind::ReadWrite {
            continue; // anchor_a is the reader, not the smaller label
        }
        let label_a = record.anchor_a.split('@').next().unwrap();
        let label_b = record.anchor_b.split('@').next().unwrap();
        assert!(
            label_a <= label_b,
            "pair not canonical in {record:?}"
        );
    }
}

#[test]
fn every_record_anchor_is_a_declared_anchor() {
    let result = analyze(MIXED_FIXTURE);
    let mut declared: Vec<String> = Vec::new();
    for module in result.design.modules.values() {
        for process in module.processes.values() {
            for anchor in &process.anchors {
                declared.push(anchor.name.clone());
            }
        }
    }
    for record in &result.records {
        assert!(
            declared.contains(&record.anchor_a),
            "unknown anchor_a in {record:?}"
        );
        assert!(
            declared.contains(&record.anchor_b),
            "unknown anchor_b in {record:?}"
        );
    }
}

#[test]
fn no_ww_without_two_blocking_writers() {
    let result = analyze(MIXED_FIXTURE);
    // b is written blocking by 'mix' and non-blocking by 'alpha': the
    // non-blocking side must never appear in a WW record.
    for record in &result.records {
        if record.kind == RaceKind::WriteWrite && record.target == "b" {
            panic!("b has only one blocking writer, got {record:?}");
        }
    }
}

#[test]
fn no_tr_record_names_an_initial_process() {
    let result = analyze(MIXED_FIXTURE);
    for record in &result.records {
        if record.kind == RaceKind::Trigger {
            assert!(
                !record.anchor_a.starts_with("boot@") && !record.anchor_b.starts_with("boot@"),
                "initial process in trigger record: {record:?}"
            );
        }
    }
}

#[test]
fn option_monotonicity_removes_exactly_one_kind() {
    let all = analyze(MIXED_FIXTURE).records;
    let cases = [
        (
            RaceKind::WriteWrite,
            DetectOptions {
                enable_ww: false,
                ..Default::default()
            },
        ),
        (
            RaceKind::ReadWrite,
            DetectOptions {
                enable_rw: false,
                ..Default::default()
            },
        ),
        (
            RaceKind::Trigger,
            DetectOptions {
                enable_tr: false,
                ..Default::default()
            },
        ),
    ];
    for (kind, options) in cases {
        let filtered = analyze_with(MIXED_FIXTURE, &options).records;
        let expected: Vec<_> = all.iter().filter(|r| r.kind != kind).cloned().collect();
        assert_eq!(filtered, expected);
    }
}

#[test]
fn all_kinds_disabled_yields_nothing() {
    let options = DetectOptions {
        enable_ww: false,
        enable_rw: false,
        enable_tr: false,
    };
    assert!(analyze_with(MIXED_FIXTURE, &options).records.is_empty());
}

#[test]
fn single_process_module_is_silent() {
    let result = analyze(
        "module solo (input clk);\nreg x;\nalways @(posedge clk) x = x + 1;\nendmodule\n",
    );
    assert!(result.records.is_empty());
}

#[test]
fn disjoint_write_sets_are_silent_for_ww_and_rw() {
    let result = analyze(
        r#"
module disjoint (input clk);
  reg a, b;
  always @(posedge clk) begin : p1 a = 1; end
  always @(posedge clk) begin : p2 b = 1; end
endmodule
"#,
    );
    assert_eq!(count_kind(&result.records, RaceKind::WriteWrite), 0);
    assert_eq!(count_kind(&result.records, RaceKind::ReadWrite), 0);
}

#[test]
fn exclusively_nonblocking_process_never_in_ww() {
    let result = analyze(
        r#"
module nb (input clk);
  reg x;
  always @(posedge clk) begin : soft x <= 1; end
  always @(posedge clk) begin : hard x = 0; end
  always @(posedge clk) begin : hard2 x = 1; end
endmodule
"#,
    );
    let ww: Vec<_> = result
        .records
        .iter()
        .filter(|r| r.kind == RaceKind::WriteWrite)
        .collect();
    // Only the two blocking writers pair up.
    assert_eq!(ww.len(), 1);
    assert!(!ww[0].anchor_a.starts_with("soft@"));
    assert!(!ww[0].anchor_b.starts_with("soft@"));
}

#[test]
fn fatal_parse_errors_surface_with_offsets() {
    let err = try_analyze("module broken;\nalways @(posedge clk) begin x = 1;\n")
        .unwrap_err();
    assert!(err.reason.contains("unbalanced 'begin'"));
    assert!(err.offset > 0);
}

#[test]
fn unsupported_constructs_do_not_block_analysis() {
    let result = analyze(
        r#"
module outer (input clk);
  reg x;
  generate
    reg unused;
  endgenerate
  always @(posedge clk) begin : p1 x = 1; end
  always @(posedge clk) begin : p2 x = 2; end
endmodule
"#,
    );
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.message.contains("generate")));
    assert_eq!(count_kind(&result.records, RaceKind::WriteWrite), 1);
}

#[test]
fn unresolved_spellings_collide_pessimistically() {
    // ext is never declared; two references with the same spelling still
    // race by name.
    let result = analyze(
        r#"
module m (input clk);
  always @(posedge clk) begin : p1 ext = 1; end
  always @(posedge clk) begin : p2 ext = 2; end
endmodule
"#,
    );
    assert_eq!(count_kind(&result.records, RaceKind::WriteWrite), 1);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.message.contains("'ext' is not declared")));
}
