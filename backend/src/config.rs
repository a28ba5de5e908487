use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::InvalidStoreBackend(s.to_owned())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a port number, got `{0}`")]
    InvalidPort(String),
    #[error("STORE_BACKEND must be `redis` or `memory`, got `{0}`")]
    InvalidStoreBackend(String),
}

/// Process-wide settings, read once at startup and handed to the router.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub store_backend: StoreBackend,
    /// Include fault details in 500 responses. Only on when `APP_ENV=development`.
    pub expose_error_details: bool,
    /// Built frontend to serve for paths outside the API.
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            store_backend: StoreBackend::Redis,
            expose_error_details: false,
            static_dir: None,
        }
    }
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };
        let store_backend = match var("STORE_BACKEND") {
            Some(raw) => raw.trim().parse()?,
            None => defaults.store_backend,
        };

        Ok(Self {
            port,
            redis_url: var("REDIS_URL").unwrap_or(defaults.redis_url),
            store_backend,
            expose_error_details: var("APP_ENV").is_some_and(|env| env == "development"),
            static_dir: var("STATIC_DIR").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.redis_url, DEFAULT_REDIS_URL);
        assert_eq!(config.store_backend, StoreBackend::Redis);
        assert!(!config.expose_error_details);
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("REDIS_URL", "redis://cache:6379/2"),
            ("STORE_BACKEND", "Memory"),
            ("APP_ENV", "development"),
            ("STATIC_DIR", "frontend/dist"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.redis_url, "redis://cache:6379/2");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(config.expose_error_details);
        assert_eq!(config.static_dir, Some(PathBuf::from("frontend/dist")));
    }

    #[test]
    fn only_development_exposes_details() {
        let config = config_from(&[("APP_ENV", "production")]).unwrap();
        assert!(!config.expose_error_details);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config_from(&[("PORT", "http")]).unwrap_err(),
            ConfigError::InvalidPort("http".to_string())
        );
        assert_eq!(
            config_from(&[("STORE_BACKEND", "mongo")]).unwrap_err(),
            ConfigError::InvalidStoreBackend("mongo".to_string())
        );
    }
}
