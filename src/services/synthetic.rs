//! Synthetic NDVI generator.
//!
//! Produces plausible filler data when the NDVI backend is unreachable or no
//! location has been selected yet. Values are not reproducible across runs
//! (randomness is unseeded in production) but always stay inside the same
//! envelope:
//!
//! - weekly cadence ending today, ascending by date, with `days / 7` rounded
//!   to the nearest whole week plus one samples (30d → 5, 90d → 14, 1y → 53)
//! - NDVI = base × seasonal × trend + noise, clamped to [0, 1]
//! - precipitation positively correlated with NDVI
//!
//! The base NDVI depends on latitude so neighbouring places look alike while
//! distant ones differ.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use rand::Rng;
use std::f64::consts::TAU;

use crate::helpers::{clamp_percent, clamp_unit, round_1dp, round_3dp};
use crate::models::{CurrentNdvi, Location, NdviSample, Quality};

/// Base NDVI used when no location is known.
const BASE_NDVI: f64 = 0.6;
/// Latitude modulation amplitude of the base NDVI.
const BASE_LATITUDE_AMPLITUDE: f64 = 0.2;
/// Seasonal oscillation amplitude (±20%).
const SEASONAL_AMPLITUDE: f64 = 0.2;
/// Extra scale applied to the oldest sample of the window.
const TREND_SPAN: f64 = 0.1;
const NOISE_HALF_WIDTH: f64 = 0.05;
const SAMPLE_STEP_DAYS: u32 = 7;

/// Location-dependent base NDVI, roughly within [0.4, 0.8].
pub fn base_ndvi(location: Option<&Location>) -> f64 {
    match location {
        Some(loc) => BASE_NDVI + (loc.latitude * 0.1).sin() * BASE_LATITUDE_AMPLITUDE,
        None => BASE_NDVI,
    }
}

/// Seasonal multiplier keyed to the zero-based calendar month (January = 0).
pub fn seasonal_factor(date: NaiveDate) -> f64 {
    1.0 + ((date.month0() as f64 / 12.0) * TAU).sin() * SEASONAL_AMPLITUDE
}

/// Trend multiplier: older samples (`days_ago` large) are scaled up slightly.
pub fn trend_factor(days_ago: u32, days: u32) -> f64 {
    if days == 0 {
        return 1.0;
    }
    1.0 + (days_ago as f64 / days as f64) * TREND_SPAN
}

/// Number of samples in a weekly series over `days`: whole weeks (rounded
/// to nearest) plus the sample for today.
pub fn series_len(days: u32) -> usize {
    (days.saturating_add(SAMPLE_STEP_DAYS / 2) / SAMPLE_STEP_DAYS) as usize + 1
}

/// Generate a weekly series ending at `today`, ascending by date.
pub fn generate_series<R: Rng + ?Sized>(
    days: u32,
    location: Option<&Location>,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<NdviSample> {
    let base = base_ndvi(location);
    let len = series_len(days);
    // Offset of the oldest sample; may overshoot `days` by up to three days.
    let span = (len as u32 - 1) * SAMPLE_STEP_DAYS;
    let mut samples = Vec::with_capacity(len);

    // Oldest offset first so the output is already chronological.
    for week in (0..len as u32).rev() {
        let days_ago = week * SAMPLE_STEP_DAYS;
        let date = today - Duration::days(i64::from(days_ago));
        let ndvi = round_3dp(clamp_unit(
            base * seasonal_factor(date) * trend_factor(days_ago, span)
                + rng.gen_range(-NOISE_HALF_WIDTH..NOISE_HALF_WIDTH),
        ));
        let precipitation =
            round_1dp((50.0 + (ndvi - 0.5) * 100.0 + rng.gen_range(-15.0..15.0)).max(0.0));
        let temperature = round_1dp(25.0 + rng.gen_range(-5.0..5.0));
        let cloud_coverage = round_1dp(clamp_percent(rng.gen_range(0.0..30.0)));

        samples.push(NdviSample {
            date,
            ndvi,
            precipitation,
            temperature,
            cloud_coverage,
        });
    }

    samples
}

/// Generate a weekly series over `days` ending today (UTC), using the thread RNG.
pub fn generate(days: u32, location: Option<&Location>) -> Vec<NdviSample> {
    generate_series(days, location, Utc::now().date_naive(), &mut rand::thread_rng())
}

/// Synthesize a point reading for `today`.
pub fn generate_current<R: Rng + ?Sized>(
    location: Option<&Location>,
    today: NaiveDate,
    rng: &mut R,
) -> CurrentNdvi {
    // A zero-day window always holds exactly the sample for `today`.
    let series = generate_series(0, location, today, rng);
    let sample = &series[0];

    CurrentNdvi {
        value: sample.ndvi,
        quality: quality_from_cloud_coverage(sample.cloud_coverage),
        cloud_coverage: sample.cloud_coverage,
        date: sample.date,
    }
}

/// Cloudier scenes give lower-confidence NDVI.
pub fn quality_from_cloud_coverage(cloud_coverage: f64) -> Quality {
    if cloud_coverage < 10.0 {
        Quality::High
    } else if cloud_coverage < 20.0 {
        Quality::Medium
    } else {
        Quality::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn santa_cruz() -> Location {
        Location::new(-29.7175, -52.4264).unwrap()
    }

    #[test]
    fn test_series_lengths() {
        let mut rng = StdRng::seed_from_u64(7);
        let loc = santa_cruz();
        for (days, expected) in [(0, 1), (7, 2), (30, 5), (90, 14), (180, 27), (365, 53)] {
            let series = generate_series(days, Some(&loc), today(), &mut rng);
            assert_eq!(series.len(), expected, "days = {}", days);
            assert_eq!(series.len(), series_len(days));
        }
    }

    #[test]
    fn test_zero_days_yields_today_only() {
        let mut rng = StdRng::seed_from_u64(1);
        let series = generate_series(0, None, today(), &mut rng);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, today());
    }

    #[test]
    fn test_series_is_strictly_ascending_and_weekly() {
        let mut rng = StdRng::seed_from_u64(42);
        let series = generate_series(90, Some(&santa_cruz()), today(), &mut rng);

        for w in series.windows(2) {
            assert_eq!(w[1].date - w[0].date, Duration::days(7));
        }
        assert_eq!(series.last().unwrap().date, today());
        assert_eq!(series.len(), 14);
        assert_eq!(series.first().unwrap().date, today() - Duration::days(91));
    }

    #[test]
    fn test_oldest_sample_carries_full_trend() {
        // Same month for every sample, so only trend and noise differ.
        let today = NaiveDate::from_ymd_opt(2026, 1, 28).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let series = generate_series(21, None, today, &mut rng);
        assert_eq!(series.len(), 4);
        let oldest = series.first().unwrap().ndvi;
        assert!((oldest - 0.66).abs() <= 0.0505, "oldest {}", oldest);
    }

    #[test]
    fn test_ranges_hold_across_many_runs() {
        let mut rng = StdRng::seed_from_u64(2026);
        for lat in [-89.0, -29.7175, 0.0, 15.7, 45.0, 89.9] {
            let loc = Location::new(lat, 10.0).unwrap();
            for _ in 0..20 {
                for s in generate_series(365, Some(&loc), today(), &mut rng) {
                    assert!((0.0..=1.0).contains(&s.ndvi), "ndvi {}", s.ndvi);
                    assert!(s.precipitation >= 0.0);
                    assert!((0.0..=100.0).contains(&s.cloud_coverage));
                    assert!((20.0..=30.0).contains(&s.temperature));
                }
            }
        }
    }

    #[test]
    fn test_ndvi_rounded_to_three_places() {
        let mut rng = StdRng::seed_from_u64(3);
        for s in generate_series(90, None, today(), &mut rng) {
            assert!((s.ndvi * 1000.0 - (s.ndvi * 1000.0).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_base_ndvi() {
        assert_eq!(base_ndvi(None), 0.6);
        let base = base_ndvi(Some(&santa_cruz()));
        assert!((0.4..=0.8).contains(&base));
        let expected = 0.6 + (-2.97175f64).sin() * 0.2;
        assert!((base - expected).abs() < 1e-12);
    }

    #[test]
    fn test_no_location_is_centered_on_base() {
        // January: seasonal factor is exactly 1, so only trend and noise move
        // the value away from 0.6.
        let january = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let series = generate_series(21, None, january, &mut rng);
        let today_sample = series.last().unwrap();
        assert!((today_sample.ndvi - 0.6).abs() <= 0.0505);
    }

    #[test]
    fn test_trend_factor() {
        assert_eq!(trend_factor(0, 90), 1.0);
        assert!((trend_factor(90, 90) - 1.1).abs() < 1e-12);
        assert_eq!(trend_factor(0, 0), 1.0);
    }

    #[test]
    fn test_seasonal_factor_january_is_neutral() {
        let jan = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert!((seasonal_factor(jan) - 1.0).abs() < 1e-12);
        let apr = NaiveDate::from_ymd_opt(2026, 4, 10).unwrap();
        assert!((seasonal_factor(apr) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_generate_current() {
        let mut rng = StdRng::seed_from_u64(5);
        let current = generate_current(Some(&santa_cruz()), today(), &mut rng);
        assert!((0.0..=1.0).contains(&current.value));
        assert!((0.0..=30.0).contains(&current.cloud_coverage));
        assert_eq!(current.date, today());
        assert_eq!(
            current.quality,
            quality_from_cloud_coverage(current.cloud_coverage)
        );
    }

    #[test]
    fn test_quality_from_cloud_coverage() {
        assert_eq!(quality_from_cloud_coverage(3.0), Quality::High);
        assert_eq!(quality_from_cloud_coverage(15.0), Quality::Medium);
        assert_eq!(quality_from_cloud_coverage(25.0), Quality::Low);
    }
}
