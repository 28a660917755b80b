/// Default upstream base URL (OpenWeatherMap 2.5 API).
const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),
}

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Fallback API key for requests that don't pass `apiKey`.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 5000,
        };

        Ok(Self {
            port,
            api_key: lookup("OPENWEATHER_API_KEY").filter(|k| !k.trim().is_empty()),
            base_url: lookup("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            json_logs: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("OPENWEATHER_API_KEY", "abc123"),
            ("OPENWEATHER_BASE_URL", "http://localhost:9999"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.base_url, "http://localhost:9999");
        assert!(config.json_logs);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = config_from(&[("OPENWEATHER_API_KEY", "  ")]).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_invalid_port() {
        assert!(matches!(
            config_from(&[("PORT", "not-a-port")]),
            Err(ConfigError::InvalidPort(_))
        ));
    }
}
