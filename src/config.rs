//! User configuration
//!
//! Optional TOML file with defaults for the snapshot path and the simulation
//! form. Looked up at `<config home>/cdbs/config.toml` unless a path is given
//! explicitly. Command-line flags override anything set here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::simulation::{
    SimulationLimits, SimulationRequest, DEFAULT_CDI_PCT, DEFAULT_INVESTED_AMOUNT,
    DEFAULT_IPCA_PCT, DEFAULT_MIN_INVESTMENT,
};

const CONFIG_DIR: &str = "cdbs";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Snapshot used when no file is given on the command line
    pub snapshot: Option<PathBuf>,
    pub min_investment: f64,
    pub default_amount: f64,
    pub cdi: f64,
    pub ipca: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot: None,
            min_investment: DEFAULT_MIN_INVESTMENT,
            default_amount: DEFAULT_INVESTED_AMOUNT,
            cdi: DEFAULT_CDI_PCT,
            ipca: DEFAULT_IPCA_PCT,
        }
    }
}

impl Settings {
    pub fn limits(&self) -> SimulationLimits {
        SimulationLimits {
            min_investment: self.min_investment,
        }
    }

    /// Simulation request built from the configured defaults, with optional overrides.
    pub fn request(
        &self,
        amount: Option<f64>,
        cdi: Option<f64>,
        ipca: Option<f64>,
    ) -> SimulationRequest {
        SimulationRequest {
            invested_amount: amount.unwrap_or(self.default_amount),
            cdi_annual_pct: cdi.unwrap_or(self.cdi),
            ipca_annual_pct: ipca.unwrap_or(self.ipca),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `explicit` (must exist) or the default location (optional).
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("No config file found, using built-in defaults");
                return Ok(Settings::default());
            }
        },
    };

    info!("Loading config from {:?}", path);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_settings(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

pub fn parse_settings(content: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(content).context("Failed to parse TOML")?;
    Ok(settings)
}
