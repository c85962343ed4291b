use std::path::PathBuf;
use std::time::Duration;

use spotlight_shared::geocode::NOMINATIM_SEARCH_URL;

/// Server settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub assets_dir: PathBuf,
    pub db_path: PathBuf,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3000,
            assets_dir: PathBuf::from("assets"),
            db_path: PathBuf::from("data/geocode.redb"),
            geocoder_url: NOMINATIM_SEARCH_URL.to_string(),
            geocoder_user_agent: "SpotLight/1.0".to_string(),
            geocoder_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys keep their defaults; malformed numbers are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Config::default();
        if let Some(port) = lookup("PORT") {
            config.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT {port:?}: {e}"))?;
        }
        if let Some(dir) = lookup("ASSETS_DIR") {
            config.assets_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("GEOCODER_URL") {
            config.geocoder_url = url;
        }
        if let Some(agent) = lookup("GEOCODER_USER_AGENT") {
            config.geocoder_user_agent = agent;
        }
        if let Some(secs) = lookup("GEOCODER_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid GEOCODER_TIMEOUT_SECS {secs:?}: {e}"))?;
            config.geocoder_timeout = Duration::from_secs(secs);
        }
        Ok(config)
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
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_path, PathBuf::from("data/geocode.redb"));
        assert_eq!(config.geocoder_user_agent, "SpotLight/1.0");
        assert_eq!(config.geocoder_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("GEOCODER_URL", "http://localhost:9999/search"),
            ("GEOCODER_TIMEOUT_SECS", "2"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.geocoder_url, "http://localhost:9999/search");
        assert_eq!(config.geocoder_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_bad_port_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
    }
}
