//! Benchmarks for landmark filter performance

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hand_sketch::filters::{
    exponential::ExponentialFilter, moving_average::MovingAverageFilter, one_euro::OneEuroFilter, NoFilter,
    PointFilter,
};

fn benchmark_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");

    // Test data - simulating a jittery fingertip path
    let test_data: Vec<(f64, f64)> = (0..100)
        .map(|i| {
            let t = i as f64 * 0.1;
            let x = 320.0 + 80.0 * t.sin() + 2.0 * rand::random::<f64>();
            let y = 240.0 + 60.0 * t.cos() + 2.0 * rand::random::<f64>();
            (x, y)
        })
        .collect();

    let filter_configs: Vec<(&str, Box<dyn PointFilter>)> = vec![
        ("no_filter", Box::new(NoFilter)),
        ("moving_average_5", Box::new(MovingAverageFilter::new(5))),
        ("moving_average_10", Box::new(MovingAverageFilter::new(10))),
        ("exponential_0.5", Box::new(ExponentialFilter::new(0.5))),
        ("one_euro", Box::new(OneEuroFilter::new(1.0, 0.15))),
    ];

    for (name, mut filter) in filter_configs {
        group.bench_with_input(
            BenchmarkId::new("single_update", name),
            &test_data[0],
            |b, &(x, y)| {
                b.iter(|| black_box(filter.apply(black_box(x), black_box(y))));
            },
        );

        group.bench_with_input(BenchmarkId::new("sequence_100", name), &test_data, |b, data| {
            b.iter(|| {
                filter.reset();
                for &(x, y) in data {
                    black_box(filter.apply(black_box(x), black_box(y)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_filters);
criterion_main!(benches);
