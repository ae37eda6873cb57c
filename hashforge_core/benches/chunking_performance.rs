//! Cost of feeding the same message in different update sizes

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hashforge_core::{AlgorithmRegistry, StreamingDriver};
use std::hint::black_box;

fn benchmark_update_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_sizes");
    let data: Vec<u8> = (0..262_144u32).map(|i| (i % 253) as u8).collect();
    group.throughput(Throughput::Bytes(data.len() as u64));

    // Unaligned sizes exercise the partial-block path on every call
    for piece in [1usize, 7, 63, 64, 65, 1_000, 8_192, 65_536] {
        group.bench_with_input(BenchmarkId::new("md5", piece), &piece, |b, &piece| {
            let mut engine = AlgorithmRegistry::global().create_engine("md5").unwrap();
            b.iter(|| {
                engine.init().unwrap();
                for chunk in data.chunks(piece) {
                    engine.update(black_box(chunk)).unwrap();
                }
                engine.finalize().unwrap();
                black_box(engine.digest());
            })
        });
    }

    group.finish();
}

fn benchmark_chunk_targets(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_targets");
    let data: Vec<u8> = (0..1_048_576u32).map(|i| (i % 241) as u8).collect();
    group.throughput(Throughput::Bytes(data.len() as u64));

    for target in [512usize, 8_192, 65_536] {
        group.bench_with_input(BenchmarkId::new("sha512", target), &target, |b, &target| {
            let driver = StreamingDriver::new(target);
            let mut engine = AlgorithmRegistry::global().create_engine("sha512").unwrap();
            b.iter(|| {
                let result = driver
                    .hash_reader(&mut engine, black_box(data.as_slice()), None, None)
                    .unwrap();
                black_box(result.digest);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_update_sizes, benchmark_chunk_targets);
criterion_main!(benches);
