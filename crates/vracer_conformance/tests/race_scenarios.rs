//! End-to-end scenarios over benchmark-style testbench sources.

use vracer_conformance::{analyze, count_kind};
use vracer_detect::RaceKind;

#[test]
fn race1_two_clocked_blocking_writers() {
    // Two clocked processes increment the same counter with blocking
    // writes: one hazard of each kind on count1.
    let result = analyze(
        r#"
module race1 (input clk);
  reg [7:0] count1;

  always @(posedge clk) begin : counter1
    count1++;
  end

  always @(posedge clk) begin : counter2
    count1++;
  end
endmodule
"#,
    );
    assert_eq!(count_kind(&result.records, RaceKind::WriteWrite), 1);
    assert_eq!(count_kind(&result.records, RaceKind::ReadWrite), 1);
    assert_eq!(count_kind(&result.records, RaceKind::Trigger), 1);
    assert_eq!(result.records.len(), 3);
    assert!(result.records.iter().all(|r| r.target == "count1"));

    let tr = result
        .records
        .iter()
        .find(|r| r.kind == RaceKind::Trigger)
        .unwrap();
    assert_eq!(tr.source, "clk");
    assert_eq!(tr.anchor_a, "counter1@posedge clk");
    assert_eq!(tr.anchor_b, "counter2@posedge clk");
}

#[test]
fn race1_initial_variant_has_no_trigger_record() {
    // Same shared counter, but one writer is an initial process: WW and RW
    // survive, trigger analysis excludes the untriggered side.
    let result = analyze(
        r#"
module race1 (input clk);
  reg [7:0] count1;

  initial begin : boot
    count1++;
  end

  always @(posedge clk) begin : counter
    count1++;
  end
endmodule
"#,
    );
    assert_eq!(count_kind(&result.records, RaceKind::WriteWrite), 1);
    assert_eq!(count_kind(&result.records, RaceKind::ReadWrite), 1);
    assert_eq!(count_kind(&result.records, RaceKind::Trigger), 0);
}

const RACE2: &str = r#"
module race2 (input clk);
  reg [7:0] count1, count2;

  initial begin : counter1
    @(posedge clk) count1++;
  end

  initial begin : counter2
    @(posedge clk) count1++;
    count2++;
  end
endmodule
"#;

#[test]
fn race2_initial_counters_with_embedded_edges() {
    // Both counters are initial processes containing an embedded
    // @(posedge clk): WW and RW on count1, no trigger records.
    let result = analyze(RACE2);
    assert_eq!(count_kind(&result.records, RaceKind::WriteWrite), 1);
    assert_eq!(count_kind(&result.records, RaceKind::ReadWrite), 1);
    assert_eq!(count_kind(&result.records, RaceKind::Trigger), 0);
    assert_eq!(result.records.len(), 2);

    // Anchors cite the embedded edge, not just the process.
    let ww = &result.records[0];
    assert_eq!(ww.anchor_a, "counter1@posedge clk#1");
    assert_eq!(ww.anchor_b, "counter2@posedge clk#1");
}

#[test]
fn race2_debug_displays_do_not_change_records() {
    // $display arguments contribute reads but no writes; reads within the
    // writing process itself pair with nothing new.
    let debug = r#"
module race2 (input clk);
  reg [7:0] count1, count2;

  initial begin : counter1
    @(posedge clk) count1++;
    $display("count1 = %0d", count1);
  end

  initial begin : counter2
    @(posedge clk) count1++;
    count2++;
    $display("count2 = %0d", count2);
  end
endmodule
"#;
    let plain = analyze(RACE2);
    let debugged = analyze(debug);
    assert_eq!(plain.records, debugged.records);
}

#[test]
fn example_8_nonblocking_writer_defuses_both_hazards() {
    // counter1 drives count1 only with a non-blocking assignment: no pair
    // of blocking writers, and no blocking writer opposite counter2's read.
    let result = analyze(
        r#"
module example_8 (input clk);
  reg [7:0] count1, count2;

  always @(posedge clk) begin : counter1
    count1 <= count1 + 1;
  end

  always @(posedge clk) begin : counter2
    count2++;
    if (count1 > 8'd10)
      count2 = 0;
  end
endmodule
"#,
    );
    assert!(
        result.records.is_empty(),
        "expected no records, got {:?}",
        result.records
    );
}

#[test]
fn accum_tb_drivers_and_monitor_produce_all_three_kinds() {
    let result = analyze(
        r#"
module accum_tb (input clk);
  reg rst, en;
  reg [7:0] data_in, model;

  always @(posedge clk) begin : drive_ctrl
    rst = 0;
    en = 1;
  end

  always @(posedge clk) begin : drive_data
    data_in = data_in + 1;
    model = model + data_in;
    rst = 0;
  end

  always @(posedge clk) begin : drive_reset
    if (rst)
      model = 0;
  end

  always @(posedge clk) begin : monitor
    $display("%b %b %0d %0d", rst, en, data_in, model);
  end
endmodule
"#,
    );
    assert!(count_kind(&result.records, RaceKind::WriteWrite) > 0);
    assert!(count_kind(&result.records, RaceKind::ReadWrite) > 0);
    assert!(count_kind(&result.records, RaceKind::Trigger) > 0);

    // rst has two blocking writers, model has two as well.
    let ww_targets: Vec<&str> = result
        .records
        .iter()
        .filter(|r| r.kind == RaceKind::WriteWrite)
        .map(|r| r.target.as_str())
        .collect();
    assert!(ww_targets.contains(&"rst"));
    assert!(ww_targets.contains(&"model"));
}

#[test]
fn example_7_nonblocking_writers_on_opposite_edges() {
    // Purely non-blocking multiple-writer scene with disjoint triggers:
    // zero records of every kind.
    let result = analyze(
        r#"
module example_7 (input clk);
  reg [7:0] q;

  always @(posedge clk) begin : w1
    q <= q + 1;
  end

  always @(negedge clk) begin : w2
    q <= q - 1;
  end
endmodule
"#,
    );
    assert!(
        result.records.is_empty(),
        "non-blocking writers on disjoint edges must be race-free: {:?}",
        result.records
    );
}

#[test]
fn example_6_independent_nonblocking_pipelines() {
    let result = analyze(
        r#"
module example_6 (input clk);
  reg [7:0] s1, s2, s3;

  always @(posedge clk) begin : stage1
    s2 <= s1;
  end

  always @(posedge clk) begin : stage2
    s3 <= s2;
  end
endmodule
"#,
    );
    // A classic shift register: reads oppose non-blocking writes only, and
    // the stages write different signals.
    assert!(
        result.records.is_empty(),
        "expected no records, got {:?}",
        result.records
    );
}

#[test]
fn verilog_ams_style_reals_are_analyzed_uniformly() {
    // Signal kinds don't gate the analysis: real-valued nets race like any
    // other name.
    let result = analyze(
        r#"
module ams (input clk);
  real vout;

  always @(posedge clk) begin : drv_a
    vout = vout + 0.5;
  end

  always @(posedge clk) begin : drv_b
    vout = 0.0;
  end
endmodule
"#,
    );
    assert_eq!(count_kind(&result.records, RaceKind::WriteWrite), 1);
    assert!(result.records.iter().all(|r| r.target == "vout"));
}

#[test]
fn multiple_modules_analyzed_independently() {
    // Processes in different modules never pair.
    let result = analyze(
        r#"
module a (input clk);
  reg x;
  always @(posedge clk) begin : p1 x = 1; end
endmodule

module b (input clk);
  reg x;
  always @(posedge clk) begin : p2 x = 2; end
endmodule
"#,
    );
    assert!(result.records.is_empty());
}
