//! # Configuration
//!
//! Start-up configuration for the process-wide pieces of valor-core: the
//! unit registry and the default quantity precision.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VALOR_DEFAULT_PRECISION=2                                          │
//! │     VALOR_UNITS=KG,L,UN                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     passed explicitly to ValorConfig::load                             │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     precision 3, no units                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [measurement]
//! default_precision = 3
//! units = ["KG", "G", "L", "ML", "UN"]
//! ```
//!
//! Load once, call [`ValorConfig::apply`], then treat the registry as
//! read-only.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::quantity::{self, DEFAULT_PRECISION, MAX_PRECISION};
use crate::unit::UnitRegistry;

/// Environment variable overriding `measurement.default_precision`.
pub const ENV_DEFAULT_PRECISION: &str = "VALOR_DEFAULT_PRECISION";

/// Environment variable overriding `measurement.units` (comma separated).
pub const ENV_UNITS: &str = "VALOR_UNITS";

// =============================================================================
// Config Error
// =============================================================================

/// Errors raised while loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside what the value objects accept.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Applying the config was rejected by valor-core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for config Results.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Measurement Configuration
// =============================================================================

/// Settings for units and quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Decimal digits used when a Quantity is built without a precision.
    pub default_precision: u32,

    /// Unit symbols to register at start-up.
    pub units: Vec<String>,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            default_precision: DEFAULT_PRECISION,
            units: Vec::new(),
        }
    }
}

// =============================================================================
// Root Configuration
// =============================================================================

/// Root configuration for valor-core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValorConfig {
    pub measurement: MeasurementConfig,
}

impl ValorConfig {
    /// Parses configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: ValorConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file, if given and present
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading valor config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.measurement.default_precision > MAX_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "default_precision must be at most {}, got {}",
                MAX_PRECISION, self.measurement.default_precision
            )));
        }
        Ok(())
    }

    /// Registers the configured units in the global registry and sets the
    /// default quantity precision.
    pub fn apply(&self) -> ConfigResult<()> {
        self.validate()?;
        self.register_units(UnitRegistry::global());
        quantity::set_default_precision(self.measurement.default_precision)?;
        info!(
            units = self.measurement.units.len(),
            default_precision = self.measurement.default_precision,
            "Valor config applied"
        );
        Ok(())
    }

    /// Registers the configured units in `registry`.
    pub fn register_units(&self, registry: &UnitRegistry) {
        registry.register(&self.measurement.units);
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary key lookup.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(precision) = lookup(ENV_DEFAULT_PRECISION) {
            match precision.trim().parse::<u32>() {
                Ok(p) => {
                    debug!(precision = p, "Overriding default precision from environment");
                    self.measurement.default_precision = p;
                }
                Err(_) => warn!(value = %precision, "Ignoring non-numeric default precision"),
            }
        }

        if let Some(units) = lookup(ENV_UNITS) {
            debug!(units = %units, "Overriding units from environment");
            self.measurement.units = units
                .split(',')
                .map(str::trim)
                .filter(|symbol| !symbol.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
