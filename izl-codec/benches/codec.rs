use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use izl_codec::{decode, encode, validate, Level, Placement};
use smallvec::smallvec;

fn generate_level(plants: usize) -> Level {
    let names = ["oPeashooter", "oSunflower", "oWallNut", "oLilyPad", "oSnowPea"];
    Level {
        name: Some("Bench".to_string()),
        music: Some("Cerebrawl".to_string()),
        sun: Some(150),
        stripe_col: Some(8),
        lf_value: Some(smallvec![0, 0, 0, 2, 0, 0]),
        plants: Some(
            (0..plants)
                .map(|i| {
                    Placement::new(
                        names[i % names.len()],
                        (i / 8) as i64,
                        (i % 8) as i64,
                        i as i64,
                    )
                })
                .collect(),
        ),
        ..Level::default()
    }
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for plants in [10usize, 100, 150] {
        let level = generate_level(plants);
        let bytes = encode(&level).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", plants), &level, |b, level| {
            b.iter(|| encode(black_box(level)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", plants), &bytes, |b, bytes| {
            b.iter(|| decode(black_box(bytes)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("validate", plants), &level, |b, level| {
            b.iter(|| validate(black_box(level)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
