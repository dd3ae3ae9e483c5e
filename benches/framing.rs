//! Benchmarks for frame construction and the disconnected write path.

use cutelog_writer::{
    LogWriterBuilder,
    log_writer::{DEFAULT_MAX_FRAME_SIZE, frame_payload},
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn bench_frame_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_payload");
    for size in [0usize, 128, 4096, 65536] {
        let payload = vec![b'x'; size];
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| frame_payload(black_box(payload), DEFAULT_MAX_FRAME_SIZE));
        });
    }
    group.finish();
}

fn bench_disconnected_write(c: &mut Criterion) {
    // Port 9 (discard) is almost never open on a development machine.
    let writer = LogWriterBuilder::new()
        .with_addr("127.0.0.1:9")
        .with_connect_wait_ms(0)
        .with_warn_interval_ms(3_600_000)
        .build()
        .expect("build writer");
    let record = br#"{"name": "bench", "levelname": "INFO", "msg": "dropped"}"#;
    c.bench_function("write_while_disconnected", |b| {
        b.iter(|| writer.write(black_box(record)));
    });
}

criterion_group!(benches, bench_frame_payload, bench_disconnected_write);
criterion_main!(benches);
