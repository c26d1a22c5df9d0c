use std::{env, str::FromStr, time::Duration};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
    #[error(transparent)]
    DotEnvError(#[from] dotenvy::Error),
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the photo/speech backend.
    pub api_url: Url,
    pub title: String,
    pub subtitle: String,
    /// Pause between flipping the letter page and showing the next speech.
    pub flip_delay: Duration,
    /// How long the upload success banner stays up before the form resets.
    pub success_delay: Duration,
    pub request_timeout: Duration,
    /// Viewport width the terminal front end starts with.
    pub viewport_width: u32,
    /// Time budget for retrying speech deletions that failed on close.
    pub retry_max_elapsed: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url_str =
            lookup("WALL_API_URL").ok_or_else(|| ConfigError::MissingVar("WALL_API_URL".into()))?;
        let api_url = Url::parse(api_url_str.trim())
            .map_err(|e| ConfigError::InvalidVar("WALL_API_URL".into(), e.to_string()))?;
        if api_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidVar(
                "WALL_API_URL".into(),
                format!("'{}' cannot be used as a base URL", api_url),
            ));
        }

        let title = lookup("WALL_TITLE").unwrap_or_else(|| "My Wall".to_string());
        let subtitle = lookup("WALL_SUBTITLE").unwrap_or_default();

        let flip_delay = Duration::from_millis(parse_or(&lookup, "WALL_FLIP_DELAY_MS", 300)?);
        let success_delay = Duration::from_millis(parse_or(&lookup, "WALL_SUCCESS_DELAY_MS", 1500)?);
        let request_timeout = Duration::from_secs(parse_or(&lookup, "WALL_REQUEST_TIMEOUT_SECS", 15)?);
        let viewport_width = parse_or(&lookup, "WALL_VIEWPORT_WIDTH", 1280)?;
        let retry_max_elapsed =
            Duration::from_secs(parse_or(&lookup, "WALL_RETRY_MAX_ELAPSED_SECS", 30)?);

        Ok(Config {
            api_url,
            title,
            subtitle,
            flip_delay,
            success_delay,
            request_timeout,
            viewport_width,
            retry_max_elapsed,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => T::from_str(raw.trim())
            .map_err(|e| ConfigError::InvalidVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_api_url_is_set() {
        let config = Config::from_lookup(lookup_from(&[("WALL_API_URL", "http://localhost:8080/api")])).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/api");
        assert_eq!(config.title, "My Wall");
        assert_eq!(config.subtitle, "");
        assert_eq!(config.flip_delay, Duration::from_millis(300));
        assert_eq!(config.success_delay, Duration::from_millis(1500));
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.viewport_width, 1280);
    }

    #[test]
    fn missing_api_url_is_reported() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref name) if name == "WALL_API_URL"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[("WALL_API_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar(ref name, _) if name == "WALL_API_URL"));

        let err = Config::from_lookup(lookup_from(&[
            ("WALL_API_URL", "http://localhost"),
            ("WALL_FLIP_DELAY_MS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar(ref name, _) if name == "WALL_FLIP_DELAY_MS"));
    }

    #[test]
    fn display_strings_come_from_the_environment() {
        let config = Config::from_lookup(lookup_from(&[
            ("WALL_API_URL", "https://wall.example"),
            ("WALL_TITLE", "Class of 2024"),
            ("WALL_SUBTITLE", "memories"),
        ]))
        .unwrap();
        assert_eq!(config.title, "Class of 2024");
        assert_eq!(config.subtitle, "memories");
    }
}
