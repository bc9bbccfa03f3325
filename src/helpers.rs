//! Shared numeric helpers for NDVI values and weather-like side channels.
//!
//! Two rounding precisions are used:
//!
//! - `round_3dp`: NDVI values (0.001 resolution is finer than any sensor reports)
//! - `round_1dp`: precipitation, temperature and cloud coverage
//!
//! Clamping helpers return the lower bound for non-finite inputs (NaN, ±Inf)
//! so that a bad upstream value can never leak out of range.

/// Round to `dp` decimal places.
pub(crate) fn round_dp(v: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (v * factor).round() / factor
}

pub(crate) fn round_1dp(v: f64) -> f64 {
    round_dp(v, 1)
}

pub(crate) fn round_3dp(v: f64) -> f64 {
    round_dp(v, 3)
}

/// Clamp an NDVI value into [0, 1].
///
/// Sensors may report [-1, 1]; the dashboard treats NDVI as [0, 1].
pub(crate) fn clamp_unit(v: f64) -> f64 {
    clamp_finite(v, 0.0, 1.0)
}

/// Clamp a percentage (e.g. cloud coverage) into [0, 100].
pub(crate) fn clamp_percent(v: f64) -> f64 {
    clamp_finite(v, 0.0, 100.0)
}

fn clamp_finite(v: f64, lo: f64, hi: f64) -> f64 {
    if !v.is_finite() {
        tracing::warn!("clamp received non-finite value {}, defaulting to {}", v, lo);
        return lo;
    }
    v.clamp(lo, hi)
}

/// Unwrap an optional upstream value, falling back to `default` when it is
/// absent or not finite.
pub(crate) fn finite_or(v: Option<f64>, default: f64) -> f64 {
    match v {
        Some(x) if x.is_finite() => x,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_3dp() {
        assert_eq!(round_3dp(0.123456), 0.123);
        assert_eq!(round_3dp(0.9996), 1.0);
    }

    #[test]
    fn test_round_1dp() {
        assert_eq!(round_1dp(24.96), 25.0);
        assert_eq!(round_1dp(-3.14), -3.1);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(-0.4), 0.0);
        assert_eq!(clamp_unit(0.42), 0.42);
        assert_eq!(clamp_unit(1.7), 1.0);
    }

    #[test]
    fn test_clamp_unit_nan() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn test_clamp_percent_infinity() {
        assert_eq!(clamp_percent(f64::INFINITY), 0.0);
        assert_eq!(clamp_percent(130.0), 100.0);
    }

    #[test]
    fn test_finite_or() {
        assert_eq!(finite_or(None, 25.0), 25.0);
        assert_eq!(finite_or(Some(f64::NAN), 25.0), 25.0);
        assert_eq!(finite_or(Some(18.5), 25.0), 18.5);
    }
}
