//! Layered service configuration
//!
//! Defaults, then an optional `gateway.toml`, then `GATEWAY__*` environment
//! variables (`GATEWAY__SERVER__PORT=9000`).

use artwork::UpstreamConfig;
use common::cache::CacheConfig;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use session::DEFAULT_KEY_PREFIX;

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// Cookie carrying the legacy session id
    pub cookie_name: String,
    pub key_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub cache: CacheConfig,
    pub session: Session,
    pub upstream: UpstreamConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_env(Environment::with_prefix("GATEWAY").separator("__"))
    }

    fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        let cache = CacheConfig::default();
        let upstream = UpstreamConfig::default();

        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8010)?
            .set_default("cache.url", cache.url)?
            .set_default("cache.timeout_ms", cache.timeout_ms)?
            .set_default("cache.retries", cache.retries)?
            .set_default("cache.reconnect_ms", cache.reconnect_ms)?
            .set_default("cache.failures", cache.failures)?
            .set_default("session.cookie_name", "saatchisclocal")?
            .set_default("session.key_prefix", DEFAULT_KEY_PREFIX)?
            .set_default("upstream.base_url", upstream.base_url)?
            .set_default("upstream.artwork_path", upstream.artwork_path)?
            .set_default("upstream.payload_key", upstream.payload_key.unwrap_or_default())?
            .add_source(
                File::with_name("gateway.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(environment.try_parsing(true))
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        settings.upstream.payload_key = settings.upstream.payload_key.filter(|key| !key.is_empty());
        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;
    use tokio_test::{assert_err, assert_ok};

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Environment::with_prefix("GATEWAY")
            .separator("__")
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let settings = assert_ok!(Settings::from_env(environment(&[])));

        assert_eq!(settings.bind_address(), "0.0.0.0:8010");
        assert_eq!(settings.cache.url, "memcache://legacy.session.memcached:11211");
        assert_eq!(settings.cache.timeout_ms, 5000);
        assert_eq!(settings.session.cookie_name, "saatchisclocal");
        assert_eq!(settings.session.key_prefix, "memc.sess.saatchi_legacy.");
        assert_eq!(settings.upstream, UpstreamConfig::default());
    }

    #[test]
    fn test_environment_overrides() {
        let settings = assert_ok!(Settings::from_env(environment(&[
            ("GATEWAY__SERVER__PORT", "9000"),
            ("GATEWAY__CACHE__RETRIES", "0"),
            ("GATEWAY__SESSION__COOKIE_NAME", "localsession"),
            ("GATEWAY__UPSTREAM__BASE_URL", "http://palette.nginx"),
            ("GATEWAY__UPSTREAM__PAYLOAD_KEY", ""),
        ])));

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.cache.retries, 0);
        assert_eq!(settings.session.cookie_name, "localsession");
        assert_eq!(settings.upstream.base_url, "http://palette.nginx");
        assert_eq!(settings.upstream.payload_key, None);
    }

    #[test]
    fn test_malformed_environment_is_rejected() {
        assert_err!(Settings::from_env(environment(&[(
            "GATEWAY__SERVER__PORT",
            "not-a-port"
        )])));
    }
}
