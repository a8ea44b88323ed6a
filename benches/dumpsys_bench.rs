//! Dumpsys import benchmarks.
//!
//! Measures report parsing as the number of devices in the report grows.
//!
//! ```sh
//! cargo bench --bench dumpsys_bench
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use invex_core::dumpsys::parse_report;
use std::fmt::Write;
use std::hint::black_box;

/// A synthetic report with `devices` devices of 100 array characteristics
/// each, every other one wrapped over two lines.
fn report(devices: usize) -> String {
    let mut out = format!(
        "== Camera Provider HAL legacy/0 (v2.5, remote) static info: {devices} devices: ==\n"
    );
    for d in 0..devices {
        let _ = writeln!(
            out,
            "== Camera HAL device device@3.5/legacy/{d} (v3.5) static information: =="
        );
        out.push_str("  Resource cost: 100\n  Facing: Back\n  API2 camera characteristics:\n");
        for k in 0..100 {
            let _ = writeln!(out, "    android.bench.key{k} ({k:x}): int32[8]");
            if k % 2 == 0 {
                out.push_str("        [0 1 2 3 4 5 6 7 ]\n");
            } else {
                out.push_str("        [0 1 2 3\n         4 5 6 7 ]\n");
            }
        }
    }
    out
}

fn parse_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("dumpsys/parse");
    for devices in [1usize, 10, 50] {
        let text = report(devices);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(devices), &text, |b, text| {
            b.iter(|| parse_report(black_box(text)))
        });
    }
    group.finish();
}

criterion_group!(benches, parse_bench);
criterion_main!(benches);
