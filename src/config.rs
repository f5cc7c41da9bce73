//! Layered settings.
//!
//! Values are resolved from, lowest to highest priority:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. `TICKWATCH_*` environment variables
//! 4. command line flags
//!
//! ```toml
//! jolokia = "http://10.0.0.5:8778/jolokia"
//! period = "2.5s"
//! timeout = "5s"
//! min_tick_ms = 50.0
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::data::DEFAULT_MIN_TICK_MS;
use crate::output::DEFAULT_MEASUREMENT;
use crate::source::{DEFAULT_ATTRIBUTE, DEFAULT_ENDPOINT, DEFAULT_MBEAN};

/// Prefix for environment overrides, e.g. `TICKWATCH_JOLOKIA`.
pub const ENV_PREFIX: &str = "TICKWATCH";

/// Raw settings as read from all layers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Jolokia agent base URL.
    pub jolokia: String,
    /// MBean exposing the tick buffer.
    pub mbean: String,
    /// Attribute holding the tick buffer.
    pub attribute: String,
    /// Time between polls, e.g. "2.5s".
    pub period: String,
    /// Request timeout, e.g. "5s".
    pub timeout: String,
    /// Minimum step between two synthetic timestamps.
    pub min_tick_ms: f64,
    /// Tag written in the first output column.
    pub measurement: String,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

/// Command line values that take precedence over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub jolokia: Option<String>,
    pub period: Option<String>,
    pub timeout: Option<String>,
    pub min_tick_ms: Option<f64>,
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("jolokia", DEFAULT_ENDPOINT)?
            .set_default("mbean", DEFAULT_MBEAN)?
            .set_default("attribute", DEFAULT_ATTRIBUTE)?
            .set_default("period", "2.5s")?
            .set_default("timeout", "5s")?
            .set_default("min_tick_ms", DEFAULT_MIN_TICK_MS)?
            .set_default("measurement", DEFAULT_MEASUREMENT)?
            .set_default("log_level", "warn")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .set_override_option("jolokia", overrides.jolokia.clone())?
            .set_override_option("period", overrides.period.clone())?
            .set_override_option("timeout", overrides.timeout.clone())?
            .set_override_option("min_tick_ms", overrides.min_tick_ms)?;

        let settings: Settings = builder
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Time between polls.
    pub fn period(&self) -> Result<Duration> {
        parse_duration(&self.period)
            .with_context(|| format!("invalid period `{}`", self.period))
    }

    /// Request timeout.
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.timeout)
            .with_context(|| format!("invalid timeout `{}`", self.timeout))
    }

    fn validate(&self) -> Result<()> {
        if self.period()?.is_zero() {
            bail!("period must be greater than zero");
        }
        if self.timeout()?.is_zero() {
            bail!("timeout must be greater than zero");
        }
        if !self.min_tick_ms.is_finite() || self.min_tick_ms <= 0.0 {
            bail!("min_tick_ms must be a positive number, got {}", self.min_tick_ms);
        }
        if self.jolokia.trim().is_empty() {
            bail!("jolokia URL must not be empty");
        }
        Ok(())
    }
}
