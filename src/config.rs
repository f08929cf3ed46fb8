use std::{fmt, str::FromStr, time::Duration};

use color_eyre::eyre::{eyre, Result, WrapErr};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PLACES_API_BASE: &str = "https://places.googleapis.com/v1";
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://127.0.0.1:5500",
    "http://localhost:5500",
    "http://127.0.0.1:3000",
    "http://localhost:3000",
];
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// How places from the two upstream searches are recognised as the same place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeKeyPolicy {
    /// Display name, falling back to the upstream identifier
    #[default]
    DisplayName,
    /// Upstream identifier, falling back to display name plus address
    Stable,
}

impl FromStr for MergeKeyPolicy {
    type Err = color_eyre::eyre::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(MergeKeyPolicy::DisplayName),
            "stable" => Ok(MergeKeyPolicy::Stable),
            other => Err(eyre!("unknown merge key policy '{other}', expected 'name' or 'stable'")),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub upstream_timeout: Duration,
    pub places_api_base: String,
    pub merge_key: MergeKeyPolicy,
}

// The api key must never reach the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("places_api_base", &self.places_api_base)
            .field("merge_key", &self.merge_key)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("GOOGLE_MAPS_API_KEY")
            .ok_or(eyre!("GOOGLE_MAPS_API_KEY is not set"))?;
        let port = match var("PORT") {
            Some(port) => port.trim().parse().wrap_err("Invalid PORT")?,
            None => DEFAULT_PORT,
        };
        let allowed_origins = match var("ALLOWED_ORIGINS") {
            Some(origins) => origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };
        let timeout_secs = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse()
                .wrap_err("Invalid UPSTREAM_TIMEOUT_SECS")?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(eyre!("UPSTREAM_TIMEOUT_SECS must be greater than zero"));
        }
        let places_api_base = var("PLACES_API_BASE")
            .map(|base| base.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_PLACES_API_BASE.to_string());
        let merge_key = match var("MERGE_KEY") {
            Some(policy) => policy.parse()?,
            None => MergeKeyPolicy::default(),
        };

        Ok(Config {
            api_key,
            port,
            allowed_origins,
            upstream_timeout: Duration::from_secs(timeout_secs),
            places_api_base,
            merge_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("GOOGLE_MAPS_API_KEY", "secret")])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.allowed_origins.len(), 4);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.places_api_base, DEFAULT_PLACES_API_BASE);
        assert_eq!(config.merge_key, MergeKeyPolicy::DisplayName);
    }

    #[test]
    fn missing_api_key_fails() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("GOOGLE_MAPS_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("GOOGLE_MAPS_API_KEY", "secret"),
            ("PORT", "8080"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("PLACES_API_BASE", "http://localhost:9000/v1/"),
            ("MERGE_KEY", "Stable"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(config.places_api_base, "http://localhost:9000/v1");
        assert_eq!(config.merge_key, MergeKeyPolicy::Stable);
    }

    #[test]
    fn bad_values_fail() {
        assert!(Config::from_lookup(lookup(&[
            ("GOOGLE_MAPS_API_KEY", "secret"),
            ("PORT", "http")
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup(&[
            ("GOOGLE_MAPS_API_KEY", "secret"),
            ("UPSTREAM_TIMEOUT_SECS", "0")
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup(&[
            ("GOOGLE_MAPS_API_KEY", "secret"),
            ("MERGE_KEY", "address")
        ]))
        .is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = Config::from_lookup(lookup(&[("GOOGLE_MAPS_API_KEY", "secret")])).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }
}
