//! NDVI backend client.
//!
//! Fetches vegetation-index series and point readings from the upstream NDVI
//! service:
//!
//! - `GET {base}/ndvi/timeseries?lat=..&lon=..&days=..` → `{ "data": [ { date, ndvi, precipitation?, temperature?, cloud_coverage? } ] }`
//! - `GET {base}/ndvi/current?lat=..&lon=..` → `{ ndvi, quality?, cloud_coverage?, date }`
//!
//! Payloads are parsed into private wire structs and then converted to domain
//! types. Anything that does not fit (empty series, missing date or NDVI,
//! non-numeric values) is reported as `AppError::MalformedPayload`.

use chrono::{DateTime, NaiveDate};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::helpers::{clamp_percent, clamp_unit, finite_or};
use crate::models::{CurrentNdvi, Location, NdviSample, Quality};
use crate::services::source::NdviSource;

/// Temperature reported when the backend omits it (°C).
const DEFAULT_TEMPERATURE_C: f64 = 25.0;

/// Client for the NDVI backend.
#[derive(Debug, Clone)]
pub struct NdviApiClient {
    client: reqwest::Client,
    base_url: String,
}

// --- NDVI backend JSON response types ---

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    data: Vec<SeriesRecord>,
}

#[derive(Debug, Deserialize)]
struct SeriesRecord {
    date: Option<String>,
    ndvi: Option<f64>,
    precipitation: Option<f64>,
    temperature: Option<f64>,
    cloud_coverage: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    ndvi: Option<f64>,
    quality: Option<String>,
    cloud_coverage: Option<f64>,
    date: Option<String>,
}

impl NdviApiClient {
    /// Build a client for `base_url` using the timeout and User-Agent from `config`.
    pub fn new(base_url: &str, config: &AppConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.ndvi_user_agent)
                .map_err(|e| AppError::InternalError(format!("Invalid User-Agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.ndvi_timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the NDVI series for the last `days` days at a location.
    pub async fn fetch_timeseries(
        &self,
        location: &Location,
        days: u32,
    ) -> Result<Vec<NdviSample>, AppError> {
        let url = format!(
            "{}/ndvi/timeseries?lat={:.4}&lon={:.4}&days={}",
            self.base_url, location.latitude, location.longitude, days
        );
        let body = self.get_json(&url).await?;
        parse_series_payload(&body)
    }

    /// Fetch the latest NDVI point reading at a location.
    pub async fn fetch_point(&self, location: &Location) -> Result<CurrentNdvi, AppError> {
        let url = format!(
            "{}/ndvi/current?lat={:.4}&lon={:.4}",
            self.base_url, location.latitude, location.longitude
        );
        let body = self.get_json(&url).await?;
        parse_current_payload(&body)
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, AppError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::ExternalServiceError(format!("NDVI backend timed out: {}", e))
            } else {
                AppError::ExternalServiceError(format!("NDVI backend request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "NDVI backend returned HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::MalformedPayload(format!("NDVI backend JSON error: {}", e)))
    }
}

impl NdviSource for NdviApiClient {
    async fn fetch_series(
        &self,
        location: &Location,
        days: u32,
    ) -> Result<Vec<NdviSample>, AppError> {
        self.fetch_timeseries(location, days).await
    }

    async fn fetch_current(&self, location: &Location) -> Result<CurrentNdvi, AppError> {
        self.fetch_point(location).await
    }
}

/// Convert a series payload into samples, ascending by date with duplicate
/// dates dropped (first record wins).
///
/// Pure function (no I/O).
pub fn parse_series_payload(raw_json: &serde_json::Value) -> Result<Vec<NdviSample>, AppError> {
    let response: SeriesResponse = serde_json::from_value(raw_json.clone()).map_err(|e| {
        AppError::MalformedPayload(format!("NDVI series structure error: {}", e))
    })?;

    if response.data.is_empty() {
        return Err(AppError::MalformedPayload(
            "NDVI backend returned an empty series".to_string(),
        ));
    }

    let mut samples = response
        .data
        .iter()
        .enumerate()
        .map(|(idx, record)| parse_series_record(idx, record))
        .collect::<Result<Vec<_>, _>>()?;

    samples.sort_by_key(|s| s.date);
    samples.dedup_by_key(|s| s.date);
    Ok(samples)
}

fn parse_series_record(idx: usize, record: &SeriesRecord) -> Result<NdviSample, AppError> {
    let date = record
        .date
        .as_deref()
        .and_then(parse_date)
        .ok_or_else(|| AppError::MalformedPayload(format!("record {} has no valid date", idx)))?;

    let ndvi = record
        .ndvi
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::MalformedPayload(format!("record {} has no valid ndvi", idx)))?;

    Ok(NdviSample {
        date,
        ndvi: clamp_unit(ndvi),
        precipitation: finite_or(record.precipitation, 0.0).max(0.0),
        temperature: finite_or(record.temperature, DEFAULT_TEMPERATURE_C),
        cloud_coverage: clamp_percent(finite_or(record.cloud_coverage, 0.0)),
    })
}

/// Convert a point payload into a `CurrentNdvi`.
///
/// Pure function (no I/O).
pub fn parse_current_payload(raw_json: &serde_json::Value) -> Result<CurrentNdvi, AppError> {
    let response: CurrentResponse = serde_json::from_value(raw_json.clone()).map_err(|e| {
        AppError::MalformedPayload(format!("NDVI point structure error: {}", e))
    })?;

    let value = response
        .ndvi
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::MalformedPayload("point reading has no valid ndvi".to_string()))?;

    let date = response
        .date
        .as_deref()
        .and_then(parse_date)
        .ok_or_else(|| AppError::MalformedPayload("point reading has no valid date".to_string()))?;

    Ok(CurrentNdvi {
        value: clamp_unit(value),
        quality: Quality::parse_lenient(response.quality.as_deref()),
        cloud_coverage: clamp_percent(finite_or(response.cloud_coverage, 0.0)),
        date,
    })
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp (date part kept).
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
