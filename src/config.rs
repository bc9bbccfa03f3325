use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_NDVI_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "OrBee/0.1 ndvi-api";
const DEFAULT_MAP_STYLE_URL: &str = "mapbox://styles/mapbox/satellite-streets-v12";

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the NDVI backend. `None` runs the API in demo mode,
    /// where every response is synthesized.
    pub ndvi_api_url: Option<String>,
    /// Per-request timeout for NDVI backend calls.
    pub ndvi_timeout: Duration,
    pub ndvi_user_agent: String,
    /// Access token for the satellite basemap tiles.
    pub map_tile_token: Option<String>,
    pub map_style_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ndvi_timeout_secs = parse_or_default(
            "NDVI_TIMEOUT_SECS",
            non_empty("NDVI_TIMEOUT_SECS"),
            DEFAULT_NDVI_TIMEOUT_SECS,
        );

        Self {
            ndvi_api_url: non_empty("NDVI_API_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            ndvi_timeout: Duration::from_secs(ndvi_timeout_secs.max(1)),
            ndvi_user_agent: non_empty("NDVI_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            map_tile_token: non_empty("MAP_TILE_TOKEN"),
            map_style_url: non_empty("MAP_STYLE_URL")
                .unwrap_or_else(|| DEFAULT_MAP_STYLE_URL.to_string()),
            port: parse_or_default("PORT", non_empty("PORT"), DEFAULT_PORT),
        }
    }
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value '{}' for {}, using {}", value, key, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.ndvi_api_url, None);
        assert_eq!(config.ndvi_timeout, Duration::from_secs(10));
        assert!(config.ndvi_user_agent.contains("OrBee"));
        assert_eq!(config.map_tile_token, None);
    }

    #[test]
    fn test_explicit_values() {
        let config = config_from(&[
            ("NDVI_API_URL", "http://ndvi.internal:9000/"),
            ("NDVI_TIMEOUT_SECS", "3"),
            ("MAP_TILE_TOKEN", "pk.test"),
            ("PORT", "9090"),
        ]);

        assert_eq!(
            config.ndvi_api_url.as_deref(),
            Some("http://ndvi.internal:9000")
        );
        assert_eq!(config.ndvi_timeout, Duration::from_secs(3));
        assert_eq!(config.map_tile_token.as_deref(), Some("pk.test"));
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("NDVI_TIMEOUT_SECS", "soon"), ("PORT", "99999")]);

        assert_eq!(config.ndvi_timeout, Duration::from_secs(10));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_blank_url_means_demo_mode() {
        let config = config_from(&[("NDVI_API_URL", "   ")]);
        assert_eq!(config.ndvi_api_url, None);
    }
}
