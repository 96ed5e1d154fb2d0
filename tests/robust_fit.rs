//! Integration tests for robust seasonal fitting on contaminated data.

use market_analytics::core::TimeSeries;
use market_analytics::error::ErrorKind;
use market_analytics::models::glm::{
    ConvergencePolicy, IrlsConfig, ObjectiveKind, SeasonalGlm, SeasonalitySpec,
};
use market_analytics::transform::{share_weighted, ShareAxis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const LEVEL: f64 = 200.0;
const SLOPE: f64 = 0.75;
const AMPLITUDE: f64 = 25.0;

fn truth(t: f64) -> f64 {
    LEVEL + SLOPE * t + AMPLITUDE * (2.0 * PI * t / 12.0).sin()
}

/// Monthly series with small uniform noise and a few large positive spikes.
fn contaminated_series(seed: u64) -> (TimeSeries, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = 96;
    let spikes: Vec<usize> = vec![5, 17, 40, 41, 77];

    let values = (0..n)
        .map(|t| {
            let mut y = truth(t as f64) + rng.gen_range(-2.0..2.0);
            if spikes.contains(&t) {
                y += rng.gen_range(150.0..300.0);
            }
            y
        })
        .collect();

    (TimeSeries::from_values(values).unwrap(), spikes)
}

fn spec() -> SeasonalitySpec {
    SeasonalitySpec::new(12.0, 1).with_trend(true)
}

#[test]
fn biweight_resists_spikes_better_than_least_squares() {
    let (series, _) = contaminated_series(7);
    let future: Vec<f64> = (96..108).map(|t| t as f64).collect();
    let actual: Vec<f64> = future.iter().map(|&t| truth(t)).collect();

    let robust = SeasonalGlm::new(spec()).fit(&series).unwrap();
    let ols = SeasonalGlm::new(spec())
        .objective(ObjectiveKind::LeastSquares)
        .fit(&series)
        .unwrap();

    let robust_rmse = robust.evaluate(&future, &actual).unwrap();
    let ols_rmse = ols.evaluate(&future, &actual).unwrap();

    assert!(robust_rmse < 2.0, "robust rmse {}", robust_rmse);
    assert!(robust_rmse < ols_rmse);
    assert!((robust.trend().unwrap() - SLOPE).abs() < 0.05);
    assert!((robust.seasonal_coefficients()[0] - AMPLITUDE).abs() < 1.0);
}

#[test]
fn spikes_receive_zero_weight() {
    let (series, spikes) = contaminated_series(11);
    let model = SeasonalGlm::new(spec()).fit(&series).unwrap();

    for &i in &spikes {
        assert_eq!(model.weights()[i], 0.0, "spike at {}", i);
    }
    let clean_min = model
        .weights()
        .iter()
        .enumerate()
        .filter(|(i, _)| !spikes.contains(i))
        .map(|(_, w)| *w)
        .fold(f64::INFINITY, f64::min);
    assert!(clean_min > 0.0);
}

#[test]
fn huber_lies_between_least_squares_and_biweight() {
    let (series, _) = contaminated_series(3);
    let fit_level = |objective| {
        SeasonalGlm::new(spec())
            .objective(objective)
            .config(IrlsConfig::default().max_iter(200))
            .fit(&series)
            .unwrap()
            .intercept()
    };

    let ols = fit_level(ObjectiveKind::LeastSquares);
    let huber = fit_level(ObjectiveKind::huber());
    let biweight = fit_level(ObjectiveKind::biweight());

    // Positive spikes pull the level up; robust objectives pull less.
    assert!(ols > huber);
    assert!((biweight - LEVEL).abs() < (ols - LEVEL).abs());
}

#[test]
fn convergence_failure_exposes_last_iterate() {
    let (series, _) = contaminated_series(5);
    let strict = SeasonalGlm::new(spec()).config(IrlsConfig::default().max_iter(2));

    let err = strict.fit(&series).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Convergence);
    let last = err.into_last_iterate().unwrap();
    assert_eq!(last.iterations(), 2);
    assert_eq!(last.coefficients().len(), spec().num_columns());

    let lenient = strict.config(
        IrlsConfig::default()
            .max_iter(2)
            .policy(ConvergencePolicy::ReturnLastIterate),
    );
    let model = lenient.fit(&series).unwrap();
    assert!(!model.converged());
    assert_eq!(model.coefficients(), last.coefficients());
}

#[test]
fn multiple_periods_are_fitted_jointly() {
    let values: Vec<f64> = (0..140)
        .map(|t| {
            let t = t as f64;
            10.0 + 3.0 * (2.0 * PI * t / 7.0).sin() + 2.0 * (2.0 * PI * t / 30.0).cos()
        })
        .collect();
    let series = TimeSeries::from_values(values).unwrap();
    let model = SeasonalGlm::new(SeasonalitySpec::new(7.0, 1).with_period(30.0, 1))
        .fit(&series)
        .unwrap();

    let c = model.seasonal_coefficients();
    assert_eq!(c.len(), 4);
    assert!((c[0] - 3.0).abs() < 1e-6);
    assert!((c[3] - 2.0).abs() < 1e-6);
}

#[test]
fn share_weighted_inputs_feed_the_fitter() {
    // Two stores; store 0 has twice the volume, so its price dominates.
    let n = 36;
    let volume: Vec<Vec<f64>> = (0..n)
        .map(|t| {
            let season = 1.0 + 0.2 * (2.0 * PI * t as f64 / 12.0).sin();
            vec![100.0 * season, 50.0 * season]
        })
        .collect();
    let price: Vec<Vec<f64>> = (0..n)
        .map(|t| vec![2.0 + 0.1 * (t % 4) as f64, 3.0])
        .collect();

    let inputs = share_weighted(&volume, &[price], ShareAxis::Row).unwrap();
    assert!((inputs.predictors[0][0] - (2.0 * 2.0 / 3.0 + 3.0 / 3.0)).abs() < 1e-12);

    let series = TimeSeries::from_values(inputs.totals.clone()).unwrap();
    let model = SeasonalGlm::new(SeasonalitySpec::new(12.0, 1))
        .objective(ObjectiveKind::LeastSquares)
        .fit_with_regressors(&series, &inputs.predictors)
        .unwrap();

    // Total volume is purely seasonal, so the price coefficient vanishes.
    assert!(model.regressor_coefficients()[0].abs() < 1e-6);
    assert!((model.seasonal_coefficients()[0] - 30.0).abs() < 1e-6);
}
