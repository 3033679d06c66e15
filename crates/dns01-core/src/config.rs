//! Configuration types for the DNS-01 responder
//!
//! Configuration is read from the environment by the hosting process:
//!
//! - `INWX_USERNAME` / `INWX_PASSWORD`: Account credentials (required)
//! - `INWX_SANDBOX`: Route calls to the OTE test endpoint (`true`/`1`/...)

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::types::DEFAULT_RECORD_TTL;
use crate::zones::ZONE_CACHE_TTL;

/// Main solver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// TTL (seconds) of created challenge records
    #[serde(default = "default_record_ttl")]
    pub record_ttl: u32,

    /// How long a zone listing is served from cache (seconds)
    #[serde(default = "default_zone_cache_ttl_secs")]
    pub zone_cache_ttl_secs: u64,
}

impl SolverConfig {
    /// Create a configuration with default tunables
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            record_ttl: default_record_ttl(),
            zone_cache_ttl_secs: default_zone_cache_ttl_secs(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::new(ProviderConfig::from_env())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;

        if self.record_ttl == 0 {
            return Err(crate::Error::config("Record TTL must be > 0"));
        }

        Ok(())
    }

    pub fn zone_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.zone_cache_ttl_secs)
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// INWX DomRobot API
    Inwx {
        username: String,
        password: String,
        /// Use the OTE sandbox endpoint instead of production
        #[serde(default)]
        sandbox: bool,
    },
}

impl ProviderConfig {
    /// Read INWX settings from `INWX_USERNAME`, `INWX_PASSWORD` and `INWX_SANDBOX`
    ///
    /// Missing variables come back as empty strings; [`ProviderConfig::validate`]
    /// rejects them.
    pub fn from_env() -> Self {
        ProviderConfig::Inwx {
            username: env::var("INWX_USERNAME").unwrap_or_default(),
            password: env::var("INWX_PASSWORD").unwrap_or_default(),
            sandbox: env::var("INWX_SANDBOX")
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or(false),
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Inwx {
                username, password, ..
            } => {
                if username.is_empty() || password.is_empty() {
                    return Err(crate::Error::config(
                        "INWX_USERNAME and INWX_PASSWORD environment variables must be set",
                    ));
                }
                Ok(())
            }
        }
    }
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Inwx {
                username, sandbox, ..
            } => f
                .debug_struct("Inwx")
                .field("username", username)
                .field("password", &"<REDACTED>")
                .field("sandbox", sandbox)
                .finish(),
        }
    }
}

/// Parse a boolean the way the hosting tooling spells them
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn default_record_ttl() -> u32 {
    DEFAULT_RECORD_TTL
}

fn default_zone_cache_ttl_secs() -> u64 {
    ZONE_CACHE_TTL.as_secs()
}
