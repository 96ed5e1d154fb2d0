//! Benchmarks for seasonal GLM fitting.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use market_analytics::core::TimeSeries;
use market_analytics::models::glm::{IrlsConfig, ObjectiveKind, SeasonalGlm, SeasonalitySpec};

fn generate_series(n: usize) -> TimeSeries {
    let values = (0..n)
        .map(|t| {
            let t = t as f64;
            let spike = if (t as usize) % 37 == 5 { 80.0 } else { 0.0 };
            100.0
                + 0.1 * t
                + 10.0 * (2.0 * std::f64::consts::PI * t / 12.0).sin()
                + 0.5 * (t * 1.7).sin()
                + spike
        })
        .collect();
    TimeSeries::from_values(values).unwrap()
}

fn bench_objectives(c: &mut Criterion) {
    let mut group = c.benchmark_group("seasonal_glm_objectives");
    let spec = SeasonalitySpec::new(12.0, 3).with_trend(true);

    for size in [120, 480, 1920].iter() {
        let series = generate_series(*size);

        for (name, objective) in [
            ("least_squares", ObjectiveKind::LeastSquares),
            ("huber", ObjectiveKind::huber()),
            ("biweight", ObjectiveKind::biweight()),
        ] {
            let glm = SeasonalGlm::new(spec.clone())
                .objective(objective)
                .config(IrlsConfig::default().max_iter(200));
            group.bench_with_input(BenchmarkId::new(name, size), size, |b, _| {
                b.iter(|| glm.fit(black_box(&series)))
            });
        }
    }

    group.finish();
}

fn bench_harmonics(c: &mut Criterion) {
    let mut group = c.benchmark_group("seasonal_glm_harmonics");
    let series = generate_series(730);

    for harmonics in [1usize, 3, 6, 10].iter() {
        let glm = SeasonalGlm::new(SeasonalitySpec::new(365.25, *harmonics).with_period(7.0, 2));
        group.bench_with_input(
            BenchmarkId::new("biweight", harmonics),
            harmonics,
            |b, _| b.iter(|| glm.fit(black_box(&series))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_objectives, bench_harmonics);
criterion_main!(benches);
