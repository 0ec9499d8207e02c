// ============================================================================
// Service Configuration
// ============================================================================
//
// Read from environment variables, each falling back to a default suited to
// local development (in-memory store, log publisher).
//
// ============================================================================

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::address::DEFAULT_MAX_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Scylla,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "scylla" => Ok(StoreBackend::Scylla),
            other => Err(ConfigError::UnknownBackend { var: "STORE_BACKEND", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublisherBackend {
    Log,
    Redpanda,
}

impl FromStr for PublisherBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(PublisherBackend::Log),
            "redpanda" => Ok(PublisherBackend::Redpanda),
            other => Err(ConfigError::UnknownBackend { var: "EVENT_PUBLISHER", value: other.to_string() }),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}: unknown backend '{value}'")]
    UnknownBackend { var: &'static str, value: String },

    #[error("{var}: invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    pub http_host: String,
    pub http_port: u16,
    pub store_backend: StoreBackend,
    pub scylla_uri: String,
    pub scylla_keyspace: String,
    pub event_publisher: PublisherBackend,
    pub redpanda_brokers: String,
    pub event_topic_prefix: String,
    pub watchlist_path: Option<PathBuf>,
    pub address_max_len: usize,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            http_host: "127.0.0.1".to_string(),
            http_port: 8080,
            store_backend: StoreBackend::Memory,
            scylla_uri: "127.0.0.1:9042".to_string(),
            scylla_keyspace: "onboarding_ks".to_string(),
            event_publisher: PublisherBackend::Log,
            redpanda_brokers: "127.0.0.1:9092".to_string(),
            event_topic_prefix: String::new(),
            watchlist_path: None,
            address_max_len: DEFAULT_MAX_LEN,
        }
    }
}

impl OnboardingConfig {
    /// Load config from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            http_host: lookup("HTTP_HOST").unwrap_or(defaults.http_host),
            http_port: number_or(&lookup, "HTTP_PORT", defaults.http_port)?,
            store_backend: lookup("STORE_BACKEND")
                .map(|v| v.parse::<StoreBackend>())
                .transpose()?
                .unwrap_or(defaults.store_backend),
            scylla_uri: lookup("SCYLLA_URI").unwrap_or(defaults.scylla_uri),
            scylla_keyspace: lookup("SCYLLA_KEYSPACE").unwrap_or(defaults.scylla_keyspace),
            event_publisher: lookup("EVENT_PUBLISHER")
                .map(|v| v.parse::<PublisherBackend>())
                .transpose()?
                .unwrap_or(defaults.event_publisher),
            redpanda_brokers: lookup("REDPANDA_BROKERS").unwrap_or(defaults.redpanda_brokers),
            event_topic_prefix: lookup("EVENT_TOPIC_PREFIX").unwrap_or(defaults.event_topic_prefix),
            watchlist_path: lookup("WATCHLIST_PATH").filter(|p| !p.is_empty()).map(PathBuf::from),
            address_max_len: number_or(&lookup, "ADDRESS_MAX_LEN", defaults.address_max_len)?,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.http_host.clone(), self.http_port)
    }
}

fn number_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { var, value }),
        },
    }
}
