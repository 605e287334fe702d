//! Service configuration read from the environment

use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// PostgreSQL connection string. Without one the service keeps rows in memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub nats_url: Option<String>,
    pub port: u16,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Ok(Self {
            database_url: present("DATABASE_URL"),
            database_max_connections: number(&present, "DATABASE_MAX_CONNECTIONS", 10)?,
            nats_url: present("NATS_URL"),
            port: number(&present, "PORT", 8083)?,
        })
    }
}

fn number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.nats_url, None);
        assert_eq!(config.port, 8083);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/pizzeria"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("NATS_URL", "nats://localhost:4222"),
            ("PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/pizzeria"));
        assert_eq!(config.database_max_connections, 4);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        assert_eq!(config(&[("DATABASE_URL", " "), ("PORT", "")]).unwrap().port, 8083);
    }

    #[test]
    fn test_invalid_port() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidNumber { name: "PORT", value: "eighty".into() });
    }
}
