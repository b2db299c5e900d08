//! Timeline benchmarks
//!
//! The sweep line should scale with the number of values, not with the
//! length of their live ranges.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use memplan_ir::features::timeline::find_peaks;
use memplan_ir::shared::models::ModuleIdentity;
use memplan_ir::{ReportParser, TimelineAnalyzer};

fn report_with(n: usize, span: u64) -> String {
    let mut report = format!("allocation 0: size {},\n", n * 256);
    for i in 0..n {
        report.push_str(&format!(" value: <{i} v{i} @0> (size=256,offset=0): f32[64]{{0}}\n"));
    }
    report.push_str("BufferLiveRange:\n");
    for i in 0..n {
        let start = (i as u64 * 7) % 10_000;
        report.push_str(&format!("v{i}{{}}:{start}-{}\n", start + span));
    }
    report
}

fn bench_size_over_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("size_over_time");

    for n in [1_000usize, 10_000, 50_000] {
        let stats = ReportParser::default()
            .parse_str(ModuleIdentity::default(), &report_with(n, 200))
            .expect("benchmark report parses");
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &stats, |b, stats| {
            b.iter(|| black_box(TimelineAnalyzer::size_over_time(stats.values().values())));
        });
    }

    group.finish();
}

fn bench_report_parse(c: &mut Criterion) {
    let report = report_with(10_000, 50);
    let mut group = c.benchmark_group("report_parse");
    group.throughput(Throughput::Bytes(report.len() as u64));
    group.bench_function("10k_values", |b| {
        b.iter(|| {
            ReportParser::default()
                .parse_str(ModuleIdentity::default(), black_box(&report))
                .map(|stats| stats.total_allocation())
        });
    });
    group.finish();
}

fn bench_find_peaks(c: &mut Criterion) {
    let curve: Vec<u64> = (0..100_000u64).map(|i| (i * 7919) % 1_000 + (i % 5_000)).collect();
    c.bench_function("find_peaks_100k", |b| {
        b.iter(|| black_box(find_peaks(black_box(&curve), 0.2)));
    });
}

criterion_group!(benches, bench_size_over_time, bench_report_parse, bench_find_peaks);
criterion_main!(benches);
