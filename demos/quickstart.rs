//! Quickstart example demonstrating basic usage of market-analytics.
//!
//! Run with: cargo run --example quickstart

use market_analytics::clustering::within_cluster_sum_of_squares;
use market_analytics::core::{ClusterAssignment, PointSet, TimeSeries};
use market_analytics::models::glm::{fit, ObjectiveKind, SeasonalitySpec};

fn main() {
    println!("=== market-analytics Quickstart ===\n");

    // 1. Within-cluster sum of squares
    let points = PointSet::new(vec![
        vec![0.0, 0.0],
        vec![0.0, 2.0],
        vec![10.0, 10.0],
        vec![10.0, 12.0],
    ])
    .unwrap();
    let assignment = ClusterAssignment::new(vec!["A", "A", "B", "B"]);
    let wss = within_cluster_sum_of_squares(&points, &assignment, None).unwrap();
    println!("WSS of two tight clusters: {:.4}", wss);

    // 2. Robust seasonal fit
    let values: Vec<f64> = (0..48)
        .map(|i| {
            let t = i as f64;
            let spike = if i == 20 { 60.0 } else { 0.0 };
            100.0                                                     // base level
            + 0.3 * t                                                 // linear trend
            + 8.0 * (2.0 * std::f64::consts::PI * t / 12.0).sin() // yearly cycle
            + spike
        })
        .collect();
    let series = TimeSeries::from_values(values).unwrap();
    println!("\nCreated monthly series with {} observations", series.len());

    let spec = SeasonalitySpec::new(12.0, 2).with_trend(true);
    let model = fit(&series, &spec, ObjectiveKind::default()).unwrap();

    println!("\n--- Biweight seasonal GLM ---");
    for (name, coef) in model.column_names().iter().zip(model.coefficients()) {
        println!("  {:<16} {:>10.4}", name, coef);
    }
    println!("Iterations: {}", model.iterations());
    println!("Weight of the spike at t=20: {:.4}", model.weights()[20]);

    // 3. Forecast the next year
    let future: Vec<f64> = (48..60).map(|t| t as f64).collect();
    let forecast = model.predict(&future).unwrap();
    println!("\nNext 12 months: {:.2?}", forecast);
}
