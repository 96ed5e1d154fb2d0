//! TimeSeries data structure for a time-indexed response.

use crate::error::{AnalyticsError, Result};
use chrono::{DateTime, Duration, Utc};

/// Convert a timestamp to a fractional number of `unit`s since the Unix epoch.
///
/// This is the time index the seasonal fitter works on, so a model fitted on
/// series built with [`TimeSeries::from_datetimes`] must be queried with the
/// same unit.
///
/// # Example
/// ```
/// use market_analytics::core::time_index;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(1970, 1, 8, 0, 0, 0).unwrap();
/// assert_eq!(time_index(&ts, Duration::days(1)).unwrap(), 7.0);
/// ```
pub fn time_index(timestamp: &DateTime<Utc>, unit: Duration) -> Result<f64> {
    const NANOS_PER_SEC: i128 = 1_000_000_000;
    let unit_ns = unit
        .num_nanoseconds()
        .map(i128::from)
        .unwrap_or_else(|| i128::from(unit.num_milliseconds()) * 1_000_000);
    if unit_ns <= 0 {
        return Err(AnalyticsError::InvalidParameter(format!(
            "time unit must be positive, got {}",
            unit
        )));
    }
    let ts_ns = i128::from(timestamp.timestamp()) * NANOS_PER_SEC
        + i128::from(timestamp.timestamp_subsec_nanos());
    // Whole units exactly, then the fractional remainder.
    let whole = ts_ns.div_euclid(unit_ns);
    let rest = ts_ns.rem_euclid(unit_ns);
    Ok(whole as f64 + rest as f64 / unit_ns as f64)
}

/// An ordered series of `(timestamp, value)` observations.
///
/// Timestamps are strictly increasing and every value is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<f64>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series from explicit numeric timestamps.
    pub fn new(timestamps: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(AnalyticsError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        validate_timestamps(&timestamps)?;
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "response value at position {} is not finite",
                i
            )));
        }
        Ok(Self { timestamps, values })
    }

    /// Create a regularly sampled series indexed `0, 1, 2, ...`.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        let timestamps = (0..values.len()).map(|i| i as f64).collect();
        Self::new(timestamps, values)
    }

    /// Create a series from calendar timestamps, measured in `unit`s since the epoch.
    pub fn from_datetimes(
        timestamps: &[DateTime<Utc>],
        values: Vec<f64>,
        unit: Duration,
    ) -> Result<Self> {
        let index = timestamps
            .iter()
            .map(|ts| time_index(ts, unit))
            .collect::<Result<Vec<_>>>()?;
        Self::new(index, values)
    }

    /// Create a series from `(timestamp, value)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (timestamps, values) = pairs.into_iter().unzip();
        Self::new(timestamps, values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(timestamp, value)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

/// Check that timestamps are finite and strictly increasing.
fn validate_timestamps(timestamps: &[f64]) -> Result<()> {
    if let Some(i) = timestamps.iter().position(|t| !t.is_finite()) {
        return Err(AnalyticsError::InvalidTimestamps(format!(
            "timestamp at position {} is not finite",
            i
        )));
    }
    if let Some(i) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
        return Err(AnalyticsError::InvalidTimestamps(format!(
            "timestamps must be strictly increasing (positions {} and {})",
            i,
            i + 1
        )));
    }
    Ok(())
}
