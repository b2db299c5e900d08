//! End-to-end report parsing tests

mod common;

use common::*;
use memplan_ir::features::report_parsing::ReportErrorKind;
use memplan_ir::shared::models::{LiveRange, ModuleIdentity, ModuleStats};
use memplan_ir::{AnalyzerConfig, MetadataValue, ReportParseError, ReportParser};
use pretty_assertions::assert_eq;

fn parse(text: &str) -> Result<ModuleStats, ReportParseError> {
    ReportParser::new(&AnalyzerConfig::default()).parse_str(ModuleIdentity::new(5, "jit_step"), text)
}

#[test]
fn test_single_allocation_and_value() {
    let stats = parse("allocation 0: size 1024,\nvalue: <1 foo@0> (size=100,offset=0): f32[10]").unwrap();

    assert_eq!(stats.allocations().len(), 1);
    assert_eq!(stats.allocations()[&0].total_size, 1024);

    let value = stats.value(1).unwrap();
    assert_eq!(value.name, "foo");
    assert_eq!(value.size, 100);
    assert_eq!(value.offset, 0);
    assert_eq!(value.array_info, "f32[10]");
    assert_eq!(value.allocation.alloc_id, 0);
    assert_eq!(stats.value_name_to_id()["foo"], 1);
    assert_eq!(stats.value_id_to_name()[&1], "foo");
}

#[test]
fn test_sample_report_model() {
    let stats = parse(SAMPLE_REPORT).unwrap();

    assert_eq!(stats.identity(), &ModuleIdentity::new(5, "jit_step"));
    assert_eq!(stats.allocations().len(), 3);
    assert_eq!(stats.values().len(), 4);
    assert_eq!(stats.total_allocation(), 256 + 1024 + 16);

    let add = stats.value_by_name("add.2").unwrap();
    assert_eq!(add.opt_name.as_deref(), Some("dynamic"));
    assert_eq!(add.allocation.alloc_id, 1);
    assert_eq!(add.live_range, LiveRange::new(3, 3));
    assert_eq!(add.sequence, Some(3));

    let used: Vec<u64> = stats.used_value_ids().iter().copied().collect();
    assert_eq!(used, vec![1, 2, 3]);
    assert!(stats.value(4).unwrap().value_detailed.is_none());
}

#[test]
fn test_sample_report_instruction_details() {
    let stats = parse(SAMPLE_REPORT).unwrap();
    let detail = stats.value(2).unwrap().value_detailed.as_ref().unwrap();

    assert_eq!(detail.positions, vec!["fusion.1"]);
    assert_eq!(detail.uses, vec!["add.2, operand 0"]);

    let inst = detail.instruction.as_ref().unwrap();
    assert_eq!(inst.var, "%fusion.1");
    assert_eq!(inst.dtype, "f32[16,16]{1,0}");
    assert_eq!(inst.op, "fusion");
    assert_eq!(inst.operands, vec!["f32[64]{0} %p0"]);
    assert_eq!(inst.attrs.get("kind").map(String::as_str), Some("kLoop"));
    assert_eq!(inst.attrs.get("calls").map(String::as_str), Some("%fused_computation"));
    assert_eq!(
        inst.metadata.get("source_line"),
        Some(&MetadataValue::Int(42))
    );

    assert_eq!(detail.op_name(), Some("jit(step)/mul"));
    assert_eq!(detail.short_source().as_deref(), Some("step.py:42"));
    assert_eq!(stats.value(2).unwrap().op_name(), Some("jit(step)/mul"));

    let sites: Vec<_> = stats.value(3).unwrap().value_detailed.as_ref().unwrap().use_sites().collect();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].user, "tuple");
    assert_eq!(sites[0].operand, Some("{}"));
}

#[test]
fn test_every_detail_references_a_value() {
    let stats = parse(SAMPLE_REPORT).unwrap();
    for detail in stats.used_values() {
        let value = stats.value(detail.id).unwrap();
        assert_eq!(value.name, detail.name);
    }
    for (name, id) in stats.value_name_to_id() {
        assert_eq!(&stats.value_id_to_name()[id], name);
    }
}

#[test]
fn test_unknown_sequence_names_are_tolerated() {
    let stats = parse(SAMPLE_REPORT).unwrap();
    // `copy.99` in the instruction sequence names no value
    assert_eq!(stats.value_by_name("p0").unwrap().sequence, Some(0));
    assert_eq!(stats.value_by_name("fusion.1").unwrap().sequence, Some(1));
    assert_eq!(stats.largest_sequence_value(), 4);
}

#[test]
fn test_braced_and_plain_names_resolve_identically() {
    let base = "allocation 0: size 8,\nvalue: <1 foo @0> (size=8,offset=0): f64[]\nBufferLiveRange:\n";
    let plain = parse(&format!("{base}foo:2-6")).unwrap();
    let braced = parse(&format!("{base}{{foo}}:2-6")).unwrap();
    let suffixed = parse(&format!("{base}foo{{}}:2-6")).unwrap();

    assert_eq!(plain.value(1).unwrap().live_range, LiveRange::new(2, 6));
    assert_eq!(braced.value(1).unwrap().live_range, plain.value(1).unwrap().live_range);
    assert_eq!(suffixed.value(1).unwrap().live_range, plain.value(1).unwrap().live_range);
}

#[test]
fn test_duplicate_value_id_fails() {
    let text = "\
allocation 0: size 64,
 value: <1 a @0> (size=8,offset=0): f32[2]{0}
 value: <1 b @0> (size=8,offset=8): f32[2]{0}
";
    let err = parse(text).unwrap_err();
    assert_eq!(err, ReportParseError::new(3, ReportErrorKind::DuplicateValueId(1)));
}

#[test]
fn test_duplicate_value_name_fails() {
    let text = "\
allocation 0: size 64,
 value: <1 a @0> (size=8,offset=0): f32[2]{0}
allocation 1: size 64,
 value: <2 a @0> (size=8,offset=0): f32[2]{0}
";
    let err = parse(text).unwrap_err();
    assert_eq!(
        err,
        ReportParseError::new(4, ReportErrorKind::DuplicateValueName("a".to_string()))
    );
}

#[test]
fn test_used_value_must_be_declared() {
    let text = "allocation 0: size 4,\nvalue: <1 a @0> (size=4,offset=0): s32[]\nUsed values:\n<7 ghost @0>\n";
    let err = parse(text).unwrap_err();
    assert_eq!(err, ReportParseError::new(4, ReportErrorKind::UnknownUsedValue(7)));
}

#[test]
fn test_live_range_errors() {
    let base = "allocation 0: size 8,\nvalue: <1 foo @0> (size=8,offset=0): f64[]\nBufferLiveRange:\n";

    let err = parse(&format!("{base}bar:1-2")).unwrap_err();
    assert_eq!(err.line, 4);
    assert_eq!(err.kind, ReportErrorKind::UnresolvedLiveRangeName("bar".to_string()));

    let err = parse(&format!("{base}foo:1")).unwrap_err();
    assert!(matches!(err.kind, ReportErrorKind::MalformedLiveRange(_)));
}

#[test]
fn test_malformed_value_line_fails() {
    let err = parse("allocation 0: size 8,\nvalue: <1 foo @0> (size=8): f64[]").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(matches!(err.kind, ReportErrorKind::MalformedValue(_)));
}

#[test]
fn test_parse_file_wraps_errors_with_path() {
    let dir = DumpDirBuilder::new().with_file("broken.txt", "allocation 0: size 8,\nvalue: <1 a @0>");
    let path = dir.path().join("broken.txt");

    let err = ReportParser::default()
        .parse_file(ModuleIdentity::default(), &path)
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("broken.txt"));
    assert!(msg.contains("line 2"));
}

#[test]
fn test_json_export() {
    let stats = parse(SAMPLE_REPORT).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stats.to_json_pretty().unwrap()).unwrap();

    assert_eq!(json["identity"]["id"], 5);
    assert_eq!(json["total_allocation"], 1296);
    assert_eq!(json["values"]["2"]["allocation"]["total_size"], 1024);
    assert_eq!(json["timeline"]["allocation_peaks"], serde_json::json!([1]));
}

#[test]
fn test_json_export_is_stable_across_parses() {
    let first = parse(SAMPLE_REPORT).unwrap().to_json_pretty().unwrap();
    let second = parse(SAMPLE_REPORT).unwrap().to_json_pretty().unwrap();
    assert_eq!(first, second);

    let report = parse(SAMPLE_REPORT).unwrap();
    let names: Vec<&str> = report
        .value_name_to_id()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["add.2", "fusion.1", "p0", "tuple"]);

    let positions: Vec<usize> = ["\"add.2\"", "\"fusion.1\"", "\"p0\"", "\"tuple\""]
        .iter()
        .map(|key| first.find(&format!("{key}: ")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}
