//! Data-source seam for NDVI acquisition.
//!
//! The acquisition service talks to a live backend through [`NdviSource`] and
//! falls back to [`SyntheticSource`]. The fallback is infallible, so it exposes
//! plain methods instead of the trait.

use chrono::Utc;
use std::future::Future;

use crate::errors::AppError;
use crate::models::{CurrentNdvi, Location, NdviSample};
use crate::services::synthetic;

/// A provider of NDVI series and point readings.
pub trait NdviSource: Send + Sync {
    /// Fetch a series covering the last `days` days, ascending by date.
    fn fetch_series(
        &self,
        location: &Location,
        days: u32,
    ) -> impl Future<Output = Result<Vec<NdviSample>, AppError>> + Send;

    /// Fetch the latest point reading.
    fn fetch_current(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<CurrentNdvi, AppError>> + Send;
}

/// Randomized generator; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSource;

impl SyntheticSource {
    pub fn series(&self, location: Option<&Location>, days: u32) -> Vec<NdviSample> {
        synthetic::generate(days, location)
    }

    pub fn current(&self, location: Option<&Location>) -> CurrentNdvi {
        synthetic::generate_current(location, Utc::now().date_naive(), &mut rand::thread_rng())
    }
}
