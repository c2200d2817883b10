use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::workflows::discovery::{DiscoveryConfig, DiscoveryPolicy};

const DEFAULT_HARVEST_BASE_URL: &str = "https://api.harvest-api.com";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub harvest: HarvestConfig,
    pub discovery: DiscoveryConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let harvest = HarvestConfig {
            api_key: env::var("HARVEST_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            base_url: env::var("HARVEST_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_HARVEST_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_var("HARVEST_TIMEOUT_SECS", 30u64)?),
        };
        if harvest.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        let defaults = DiscoveryConfig::default();
        let policy = match env::var("DISCOVERY_POLICY") {
            Ok(raw) => raw
                .parse::<DiscoveryPolicy>()
                .map_err(|_| ConfigError::InvalidPolicy { value: raw })?,
            Err(_) => defaults.policy,
        };
        let discovery = DiscoveryConfig {
            policy,
            target_pool_size: parse_var("DISCOVERY_TARGET", defaults.target_pool_size)?,
            page_limit: parse_var("DISCOVERY_PAGE_LIMIT", defaults.page_limit)?,
            preview_limit: parse_var("DISCOVERY_PREVIEW_LIMIT", defaults.preview_limit)?,
            call_timeout: harvest.timeout + Duration::from_secs(5),
        };
        discovery
            .validate()
            .map_err(|reason| ConfigError::InvalidDiscovery { reason })?;

        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
        let candidates_csv = env::var("CANDIDATES_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("candidates.csv"));
        let storage = StorageConfig {
            candidates_csv,
            backup_previous: parse_flag("CANDIDATES_BACKUP", true)?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            harvest,
            discovery,
            storage,
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { key, value: raw }),
        },
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Credentials and transport settings for the Harvest people-search API.
#[derive(Clone)]
pub struct HarvestConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl HarvestConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_HARVEST_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for HarvestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarvestConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Where ranked candidates are persisted.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub candidates_csv: PathBuf,
    pub backup_previous: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidFlag { key: &'static str, value: String },
    InvalidPolicy { value: String },
    InvalidDiscovery { reason: String },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative integer (got '{value}')")
            }
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{key} must be true or false (got '{value}')")
            }
            ConfigError::InvalidPolicy { value } => write!(
                f,
                "DISCOVERY_POLICY must be 'accumulate' or 'first-hit' (got '{value}')"
            ),
            ConfigError::InvalidDiscovery { reason } => {
                write!(f, "invalid discovery settings: {reason}")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "HARVEST_TIMEOUT_SECS must be greater than 0")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidPolicy { .. }
            | ConfigError::InvalidDiscovery { .. }
            | ConfigError::InvalidTimeout => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "HARVEST_API_KEY",
            "HARVEST_BASE_URL",
            "HARVEST_TIMEOUT_SECS",
            "DISCOVERY_POLICY",
            "DISCOVERY_TARGET",
            "DISCOVERY_PAGE_LIMIT",
            "DISCOVERY_PREVIEW_LIMIT",
            "DATA_DIR",
            "CANDIDATES_CSV",
            "CANDIDATES_BACKUP",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.harvest.api_key.is_none());
        assert_eq!(config.harvest.base_url, DEFAULT_HARVEST_BASE_URL);
        assert_eq!(config.harvest.timeout, Duration::from_secs(30));
        assert_eq!(config.discovery.policy, DiscoveryPolicy::Accumulate);
        assert_eq!(config.discovery.target_pool_size, 40);
        assert_eq!(config.discovery.preview_limit, 25);
        assert_eq!(
            config.storage.candidates_csv,
            PathBuf::from("data").join("candidates.csv")
        );
        assert!(config.storage.backup_previous);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_discovery_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DISCOVERY_POLICY", "first-hit");
        env::set_var("DISCOVERY_TARGET", "12");
        env::set_var("HARVEST_API_KEY", "  secret  ");
        env::set_var("DATA_DIR", "/tmp/scout");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.discovery.policy, DiscoveryPolicy::FirstHit);
        assert_eq!(config.discovery.target_pool_size, 12);
        assert_eq!(config.harvest.api_key.as_deref(), Some("secret"));
        assert_eq!(
            config.storage.candidates_csv,
            PathBuf::from("/tmp/scout/candidates.csv")
        );
        reset_env();
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("HARVEST_API_KEY", "   ");
        let config = AppConfig::load().expect("config loads");
        assert!(config.harvest.api_key.is_none());
        reset_env();
    }

    #[test]
    fn rejects_unknown_policy_and_bad_numbers() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DISCOVERY_POLICY", "random");
        let err = AppConfig::load().expect_err("policy rejected");
        assert!(matches!(err, ConfigError::InvalidPolicy { .. }));

        reset_env();
        env::set_var("DISCOVERY_TARGET", "forty");
        let err = AppConfig::load().expect_err("target rejected");
        assert!(err.to_string().contains("DISCOVERY_TARGET"));

        reset_env();
        env::set_var("CANDIDATES_BACKUP", "maybe");
        let err = AppConfig::load().expect_err("flag rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidFlag {
                key: "CANDIDATES_BACKUP",
                ..
            }
        ));

        reset_env();
        env::set_var("DISCOVERY_PAGE_LIMIT", "0");
        let err = AppConfig::load().expect_err("zero page limit rejected");
        assert!(matches!(err, ConfigError::InvalidDiscovery { .. }));
        reset_env();
    }

    #[test]
    fn rejects_zero_harvest_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("HARVEST_TIMEOUT_SECS", "0");
        let err = AppConfig::load().expect_err("zero timeout rejected");
        assert!(matches!(err, ConfigError::InvalidTimeout));
        assert!(err.to_string().contains("HARVEST_TIMEOUT_SECS"));

        env::set_var("HARVEST_TIMEOUT_SECS", "7");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.harvest.timeout, Duration::from_secs(7));
        assert_eq!(config.discovery.call_timeout, Duration::from_secs(12));
        reset_env();
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = HarvestConfig::with_api_key("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
