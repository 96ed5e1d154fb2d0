//! Seasonal GLM Example
//!
//! This example fits weekly sales with Fourier seasonality under different
//! robust objectives and compares their sensitivity to promotion spikes.
//!
//! Run with: cargo run --example seasonal_glm

use chrono::{Duration, TimeZone, Utc};
use market_analytics::core::TimeSeries;
use market_analytics::models::glm::{
    ConvergencePolicy, IrlsConfig, ObjectiveKind, SeasonalGlm, SeasonalitySpec,
};

fn main() {
    println!("=== Seasonal GLM Example ===\n");

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let days: Vec<_> = (0..84).map(|i| start + Duration::days(i)).collect();

    let values: Vec<f64> = (0..84)
        .map(|i| {
            let t = i as f64;
            let weekly = 12.0 * (2.0 * std::f64::consts::PI * t / 7.0).cos();
            let promo = if i % 30 == 10 { 90.0 } else { 0.0 };
            250.0 + weekly + promo + ((i * 13) % 7) as f64 - 3.0
        })
        .collect();

    let series = TimeSeries::from_datetimes(&days, values, Duration::days(1)).unwrap();
    let spec = SeasonalitySpec::new(7.0, 2);

    let next_week: Vec<_> = (84..91).map(|i| start + Duration::days(i)).collect();

    for objective in [
        ObjectiveKind::LeastSquares,
        ObjectiveKind::huber(),
        ObjectiveKind::biweight(),
    ] {
        let model = SeasonalGlm::new(spec.clone())
            .objective(objective)
            .config(
                IrlsConfig::default()
                    .max_iter(100)
                    .policy(ConvergencePolicy::ReturnLastIterate),
            )
            .fit(&series)
            .unwrap();

        println!("--- {} ---", objective.name());
        println!(
            "  level {:.3} (se {:.3}, p {:.2e})",
            model.intercept(),
            model.standard_errors()[0],
            model.p_values()[0]
        );
        println!(
            "  converged: {} after {} iterations",
            model.converged(),
            model.iterations()
        );
        let forecast = model
            .predict_datetimes(&next_week, Duration::days(1))
            .unwrap();
        println!("  next week: {:.1?}\n", forecast);
    }
}
