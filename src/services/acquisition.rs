//! NDVI acquisition with silent synthetic fallback.
//!
//! Resolution for both series and point readings:
//!   1. No (valid) location → synthetic data, location-independent base.
//!   2. No live source configured (demo mode) → synthetic data for the location.
//!   3. One live call; a non-empty, well-formed result is returned as-is.
//!   4. Any failure (transport, timeout, non-2xx, malformed/empty payload)
//!      is logged and replaced by synthetic data for the same location/window.
//!
//! The service never returns an error: callers can always render what they get.
//! Each result is tagged with its `DataOrigin` so the UI may badge simulated data.

use crate::models::{Acquired, CurrentNdvi, Location, NdviSample, Period};
use crate::services::source::{NdviSource, SyntheticSource};

/// Acquisition facade over an optional live source.
#[derive(Debug, Clone)]
pub struct NdviService<S> {
    live: Option<S>,
    synthetic: SyntheticSource,
}

impl<S: NdviSource> NdviService<S> {
    pub fn new(live: Option<S>) -> Self {
        Self {
            live,
            synthetic: SyntheticSource,
        }
    }

    /// Whether a live backend is configured.
    pub fn has_live_source(&self) -> bool {
        self.live.is_some()
    }

    /// Return an ascending, non-empty NDVI series for the location and period.
    ///
    /// Coordinates that are absent, only half present or out of range are
    /// treated as "no location yet".
    pub async fn get_time_series(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
        period: Period,
    ) -> Acquired<Vec<NdviSample>> {
        let days = period.days();

        let Some(location) = Location::from_parts(latitude, longitude) else {
            tracing::debug!("No location selected, synthesizing {} NDVI series", period);
            return Acquired::synthetic(self.synthetic.series(None, days));
        };

        self.get_time_series_at(&location, period).await
    }

    /// Same as [`get_time_series`](Self::get_time_series) for an already validated location.
    pub async fn get_time_series_at(
        &self,
        location: &Location,
        period: Period,
    ) -> Acquired<Vec<NdviSample>> {
        let days = period.days();

        let Some(live) = &self.live else {
            return Acquired::synthetic(self.synthetic.series(Some(location), days));
        };

        match live.fetch_series(location, days).await {
            Ok(samples) if is_well_formed(&samples) => Acquired::live(samples),
            Ok(_) => {
                tracing::warn!(
                    "NDVI backend returned an unusable series for ({:.4}, {:.4}), using synthetic data",
                    location.latitude,
                    location.longitude
                );
                Acquired::synthetic(self.synthetic.series(Some(location), days))
            }
            Err(e) => {
                tracing::warn!(
                    "NDVI series unavailable for ({:.4}, {:.4}), using synthetic data: {}",
                    location.latitude,
                    location.longitude,
                    e
                );
                Acquired::synthetic(self.synthetic.series(Some(location), days))
            }
        }
    }

    /// Return the current NDVI point reading for the location.
    pub async fn get_current_ndvi(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Acquired<CurrentNdvi> {
        let Some(location) = Location::from_parts(latitude, longitude) else {
            tracing::debug!("No location selected, synthesizing current NDVI");
            return Acquired::synthetic(self.synthetic.current(None));
        };

        self.get_current_ndvi_at(&location).await
    }

    /// Same as [`get_current_ndvi`](Self::get_current_ndvi) for an already validated location.
    pub async fn get_current_ndvi_at(&self, location: &Location) -> Acquired<CurrentNdvi> {
        let Some(live) = &self.live else {
            return Acquired::synthetic(self.synthetic.current(Some(location)));
        };

        match live.fetch_current(location).await {
            Ok(current) if current.value.is_finite() => Acquired::live(current),
            Ok(_) => {
                tracing::warn!("NDVI backend returned a non-finite point value, using synthetic data");
                Acquired::synthetic(self.synthetic.current(Some(location)))
            }
            Err(e) => {
                tracing::warn!(
                    "Current NDVI unavailable for ({:.4}, {:.4}), using synthetic data: {}",
                    location.latitude,
                    location.longitude,
                    e
                );
                Acquired::synthetic(self.synthetic.current(Some(location)))
            }
        }
    }
}

/// A live series is usable when it is non-empty, strictly ascending by date
/// and every NDVI value lies in [0, 1].
fn is_well_formed(samples: &[NdviSample]) -> bool {
    !samples.is_empty()
        && samples.windows(2).all(|w| w[0].date < w[1].date)
        && samples.iter().all(|s| (0.0..=1.0).contains(&s.ndvi))
}
