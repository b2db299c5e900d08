//! Report text fixtures

/// A small but complete buffer-assignment report covering every section
///
/// Timeline (instants 0..=5):
///
/// ```text
/// p0      [0, 5]  256
/// fusion  [1, 2]  1024
/// add     [3, 3]  512
/// tuple   [4, 5]  16
/// totals: 256, 1280, 1280, 768, 272, 272
/// ```
pub const SAMPLE_REPORT: &str = r#"BufferAssignment:
allocation 0: size 256, parameter 0, shape |f32[64]| at ShapeIndex {}:
 value: <1 p0 @0> (size=256,offset=0): f32[64]{0}
allocation 1: size 1024, maybe-live-out:
 value: <2 fusion.1 @0> (size=1024,offset=0): f32[16,16]{1,0}
 value: <3 add.2 (dynamic) @0> (size=512,offset=0): f32[128]{0}
allocation 2: size 16, output shape is |(f32[2], f32[2])|:
 value: <4 tuple @0> (size=16,offset=0): (f32[2]{0}, f32[2]{0})

Total bytes used: 1296 (1.27KiB)

Used values:
<1 p0 @0>
 positions:
  p0
 uses:
  fusion.1, operand 0
 from instruction: %p0 = f32[64]{0} parameter(0), metadata={op_name="x"}
<2 fusion.1 @0>
 positions:
  fusion.1
 uses:
  add.2, operand 0
 from instruction: %fusion.1 = f32[16,16]{1,0} fusion(f32[64]{0} %p0), kind=kLoop, calls=%fused_computation, metadata={op_name="jit(step)/mul" source_file="/src/model/step.py" source_line=42}
<3 add.2 (dynamic) @0>
 positions:
  add.2
 uses:
  tuple, operand 0, {}
 from instruction: %add.2 = f32[128]{0} add(f32[128]{0} %a, f32[128]{0} %b)

HloLiveRange (max 5):
  InstructionSequence:
    0:p0
    1:fusion.1
    2:copy.99
    3:add.2
    4:tuple
  BufferLiveRange:
    p0{}:0-5
    fusion.1{}:1-2
    add.2:3-3
    {tuple}:4-5
  Live ranges at 1 (peak):
    fusion.1: 1024 bytes
    p0: 256 bytes
"#;

/// One allocation holding `n` values whose live ranges are staggered
pub fn fixture_staggered_values(n: usize) -> String {
    let mut report = format!("allocation 0: size {},\n", n * 64);
    for i in 0..n {
        report.push_str(&format!(
            " value: <{id} v{id} @0> (size=64,offset={offset}): f32[16]{{0}}\n",
            id = i,
            offset = i * 64
        ));
    }
    report.push_str("HloLiveRange (max 0):\n  BufferLiveRange:\n");
    for i in 0..n {
        report.push_str(&format!("    v{}{{}}:{}-{}\n", i, i, i + 3));
    }
    report
}

/// Smallest report with a single allocation of `size` bytes
pub fn fixture_single_allocation(size: u64) -> String {
    format!("allocation 0: size {size},\n value: <1 v @0> (size={size},offset=0): u8[{size}]{{0}}\n")
}
