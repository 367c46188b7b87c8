use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use octopus::example::example_metro_map;
use octopus::{MakeSpaceOptions, Strategy, make_space};
use std::hint::black_box;
use std::time::Duration;

fn bench_make_space(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_space");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let cases = [
        ("demo_margin_25", 25.0),
        ("demo_margin_10", 10.0),
    ];

    for strategy in [Strategy::Scale, Strategy::Displace] {
        for (name, edge_margin) in cases {
            let options = MakeSpaceOptions {
                edge_margin,
                ..Default::default()
            };
            group.bench_with_input(
                BenchmarkId::new(strategy.as_str(), name),
                &options,
                |b, options| {
                    b.iter_batched(
                        || example_metro_map(options.clone()).expect("demo map"),
                        |mut map| {
                            let report = make_space(black_box(&mut map), strategy)
                                .expect("make space");
                            black_box(report.iterations());
                        },
                        BatchSize::LargeInput,
                    )
                },
            );
        }
    }

    group.finish();
}

fn bench_conflict_evaluation(c: &mut Criterion) {
    let map = example_metro_map(MakeSpaceOptions::default()).expect("demo map");
    c.bench_function("evaluate_conflicts/demo", |b| {
        b.iter(|| black_box(map.evaluate_conflicts().len()))
    });
}

criterion_group!(benches, bench_make_space, bench_conflict_evaluation);
criterion_main!(benches);
