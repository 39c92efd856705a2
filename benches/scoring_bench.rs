use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use classroom_monitor::core::{
    engagement::{score_gaze, GazeDirection},
    identity::{Gallery, IdentityMatcher, KnownIdentity},
    posture::{analyze_posture, BodyLandmarks, Point},
};

const EMBEDDING_LEN: usize = 128;

fn embedding(seed: usize) -> Vec<f32> {
    (0..EMBEDDING_LEN)
        .map(|i| ((seed * 31 + i * 7) % 97) as f32 / 97.0)
        .collect()
}

fn bench_identity_matching(c: &mut Criterion) {
    let matcher = IdentityMatcher::default();
    let probe = embedding(3);

    let mut group = c.benchmark_group("identity_matching");
    for size in [10, 100, 1000] {
        let gallery = Gallery::new(
            (0..size)
                .map(|i| KnownIdentity::new(format!("student{}", i), embedding(i)))
                .collect(),
        );
        group.bench_with_input(BenchmarkId::from_parameter(size), &gallery, |b, gallery| {
            b.iter(|| matcher.best_match(black_box(&probe), gallery))
        });
    }
    group.finish();
}

fn bench_posture_analysis(c: &mut Criterion) {
    let landmarks = BodyLandmarks {
        nose: Some(Point::new(0.5, 0.3)),
        left_shoulder: Some(Point::new(0.35, 0.5)),
        right_shoulder: Some(Point::new(0.65, 0.5)),
        left_ear: Some(Point::new(0.42, 0.28)),
        right_ear: Some(Point::new(0.58, 0.28)),
    };

    c.bench_function("posture_analysis", |b| {
        b.iter(|| analyze_posture(black_box(Some(&landmarks))))
    });
}

fn bench_engagement(c: &mut Criterion) {
    c.bench_function("engagement_scoring", |b| {
        b.iter(|| score_gaze(black_box(GazeDirection::LookingLeft)))
    });
}

criterion_group!(
    scoring_benches,
    bench_identity_matching,
    bench_posture_analysis,
    bench_engagement
);
criterion_main!(scoring_benches);
