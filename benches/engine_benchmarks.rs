//! Benchmarks for the gesture classifier and the sketch engine hot paths

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hand_sketch::constants::{INDEX_PIP, INDEX_TIP, NUM_HAND_LANDMARKS, THUMB_TIP};
use hand_sketch::engine::SketchEngine;
use hand_sketch::gesture::{GestureClassifier, LandmarkSet};
use hand_sketch::sketch::{Stroke, StrokeStore};
use opencv::core::Point;

fn pointing_hand(cursor: Point) -> LandmarkSet {
    let mut points = vec![Point::new(cursor.x, cursor.y + 100); NUM_HAND_LANDMARKS];
    points[INDEX_PIP] = Point::new(cursor.x, cursor.y + 50);
    points[INDEX_TIP] = cursor;
    points[THUMB_TIP] = Point::new(cursor.x - 200, cursor.y + 100);
    LandmarkSet::from_points(&points).unwrap()
}

fn random_store(strokes: usize, points_per_stroke: usize) -> StrokeStore {
    let mut store = StrokeStore::new();
    for _ in 0..strokes {
        let mut stroke = Stroke::starting_at(Point::new(
            (rand::random::<u32>() % 640) as i32,
            (rand::random::<u32>() % 480) as i32,
        ));
        for _ in 1..points_per_stroke {
            let last = stroke.last().unwrap();
            stroke.push(Point::new(
                (last.x + (rand::random::<i32>() % 9) - 4).clamp(0, 639),
                (last.y + (rand::random::<i32>() % 9) - 4).clamp(0, 479),
            ));
        }
        store.push_stroke(stroke);
    }
    store
}

fn benchmark_classify(c: &mut Criterion) {
    let classifier = GestureClassifier::default();
    let lm = pointing_hand(Point::new(320, 120));

    c.bench_function("classify", |b| {
        b.iter(|| black_box(classifier.classify(black_box(&lm))));
    });
}

fn benchmark_grab_onset_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("grab_onset_scan");

    for (strokes, points) in [(10, 50), (50, 100), (200, 200)] {
        let store = random_store(strokes, points);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{strokes}x{points}")),
            &store,
            |b, store| {
                b.iter(|| black_box(store.nearest_stroke_within(black_box(Point::new(320, 240)), 26.0)));
            },
        );
    }

    group.finish();
}

fn benchmark_engine_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_step");

    group.bench_function("draw_frame", |b| {
        let mut engine = SketchEngine::new();
        let mut x = 0;
        b.iter(|| {
            x = (x + 5) % 640;
            black_box(engine.step(Some(&pointing_hand(Point::new(x, 240)))));
        });
    });

    group.bench_function("no_hand_frame", |b| {
        let mut engine = SketchEngine::new();
        b.iter(|| black_box(engine.step(None)));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_classify,
    benchmark_grab_onset_scan,
    benchmark_engine_step
);
criterion_main!(benches);
