//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `wattwise.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::collections::HashSet;

use chrono_tz::Tz;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use wattwise_adapter_awattar::AwattarConfig;
use wattwise_domain::best_price::BestPriceConfig;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// aWATTar API settings.
    pub awattar: AwattarConfig,
    /// IANA zone used for local hours (horizon anchors, `hours` channel).
    pub timezone: String,
    /// Seconds between two refresh ticks.
    pub refresh_interval_secs: u64,
    /// Configured best-price things.
    pub best_price: Vec<BestPriceThing>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// One `[[best_price]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct BestPriceThing {
    pub name: String,
    #[serde(flatten)]
    pub config: BestPriceConfig,
}

impl Config {
    /// Load configuration from `wattwise.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("wattwise.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("WATTWISE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("WATTWISE_COUNTRY")
            && let Ok(country) = val.parse()
        {
            self.awattar.country = country;
        }
        if let Some(val) = lookup("WATTWISE_TIMEZONE") {
            self.timezone = val;
        }
        if let Some(val) = lookup("WATTWISE_REFRESH_SECS")
            && let Ok(secs) = val.parse()
        {
            self.refresh_interval_secs = secs;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.zone()?;
        EnvFilter::try_new(&self.logging.filter).map_err(|err| {
            ConfigError::Validation(format!(
                "invalid logging filter {:?}: {err}",
                self.logging.filter
            ))
        })?;
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "refresh_interval_secs must be non-zero".to_string(),
            ));
        }
        if !self.awattar.vat_percent.is_finite() || !self.awattar.base_price.is_finite() {
            return Err(ConfigError::Validation(
                "awattar prices must be finite".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for thing in &self.best_price {
            if thing.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "best_price name must not be empty".to_string(),
                ));
            }
            if !names.insert(thing.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate best_price name {:?}",
                    thing.name
                )));
            }
            thing.config.validate().map_err(|err| {
                ConfigError::Validation(format!("best_price {:?}: {err}", thing.name))
            })?;
        }
        Ok(())
    }

    /// The configured time zone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an unknown zone name.
    pub fn zone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse()
            .map_err(|_| ConfigError::Validation(format!("unknown timezone {:?}", self.timezone)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            awattar: AwattarConfig::default(),
            timezone: "Europe/Berlin".to_string(),
            refresh_interval_secs: 60,
            best_price: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "wattwised=info,wattwise_app=info,wattwise_adapter_awattar=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
