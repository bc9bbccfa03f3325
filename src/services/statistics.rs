//! Summary statistics shown next to the NDVI chart.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::NdviSample;

/// Direction of the most recent change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Derived values over an ascending NDVI series.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NdviStatistics {
    /// NDVI of the latest sample
    pub current: f64,
    /// NDVI of the sample before the latest (equals `current` for a single sample)
    pub previous: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub trend: Trend,
    /// Absolute relative change between `previous` and `current`, in percent
    pub trend_value_percent: f64,
}

/// Compute chart statistics. Returns `None` for an empty series.
pub fn compute_statistics(samples: &[NdviSample]) -> Option<NdviStatistics> {
    let last = samples.last()?;
    let current = last.ndvi;
    let previous = samples
        .len()
        .checked_sub(2)
        .map(|idx| samples[idx].ndvi)
        .unwrap_or(current);

    let sum: f64 = samples.iter().map(|s| s.ndvi).sum();
    let average = sum / samples.len() as f64;
    let max = samples.iter().map(|s| s.ndvi).fold(f64::NEG_INFINITY, f64::max);
    let min = samples.iter().map(|s| s.ndvi).fold(f64::INFINITY, f64::min);

    let trend = if current > previous {
        Trend::Up
    } else if current < previous {
        Trend::Down
    } else {
        Trend::Stable
    };

    Some(NdviStatistics {
        current,
        previous,
        average,
        max,
        min,
        trend,
        trend_value_percent: percent_change(previous, current),
    })
}

/// `|(current - previous) / previous| * 100`, or 0 when `previous` is zero.
fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    let pct = ((current - previous) / previous * 100.0).abs();
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(values: &[f64]) -> Vec<NdviSample> {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &ndvi)| NdviSample {
                date: start + Duration::days(7 * i as i64),
                ndvi,
                precipitation: 40.0,
                temperature: 25.0,
                cloud_coverage: 10.0,
            })
            .collect()
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(compute_statistics(&[]), None);
    }

    #[test]
    fn test_single_sample_is_stable() {
        let stats = compute_statistics(&series(&[0.55])).unwrap();
        assert_eq!(stats.trend, Trend::Stable);
        assert_eq!(stats.previous, 0.55);
        assert_eq!(stats.trend_value_percent, 0.0);
        assert_eq!(stats.average, 0.55);
        assert_eq!(stats.min, 0.55);
        assert_eq!(stats.max, 0.55);
    }

    #[test]
    fn test_upward_trend() {
        let stats = compute_statistics(&series(&[0.4, 0.5, 0.6])).unwrap();
        assert_eq!(stats.current, 0.6);
        assert_eq!(stats.previous, 0.5);
        assert_eq!(stats.trend, Trend::Up);
        assert!((stats.trend_value_percent - 20.0).abs() < 1e-9);
        assert!((stats.average - 0.5).abs() < 1e-12);
        assert_eq!(stats.min, 0.4);
        assert_eq!(stats.max, 0.6);
    }

    #[test]
    fn test_downward_trend_percent_is_absolute() {
        let stats = compute_statistics(&series(&[0.8, 0.6])).unwrap();
        assert_eq!(stats.trend, Trend::Down);
        assert!((stats.trend_value_percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_previous_zero_is_guarded() {
        let stats = compute_statistics(&series(&[0.3, 0.0, 0.2])).unwrap();
        assert_eq!(stats.trend, Trend::Up);
        assert_eq!(stats.trend_value_percent, 0.0);
    }

    #[test]
    fn test_flat_series_is_stable() {
        let stats = compute_statistics(&series(&[0.5, 0.5])).unwrap();
        assert_eq!(stats.trend, Trend::Stable);
        assert_eq!(stats.trend_value_percent, 0.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let stats = compute_statistics(&series(&[0.4, 0.5])).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["trend"], "up");
        assert!(json.get("trendValuePercent").is_some());
    }
}
