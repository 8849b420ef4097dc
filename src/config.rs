use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{GarudaError, Result};
use crate::simulation::SeverityModel;

pub const MIN_INTERVAL_SECS: u64 = 1;
pub const MAX_INTERVAL_SECS: u64 = 10;

/// Synthetic DDoS telemetry dashboard
#[derive(Debug, Clone, Parser)]
#[command(name = "garuda", version)]
pub struct Config {
    /// Seconds between dashboard refreshes (1-10)
    #[arg(long, env = "GARUDA_INTERVAL_SECS", default_value_t = 2)]
    pub interval_secs: u64,

    /// Stop after this many ticks; runs until Ctrl-C when unset
    #[arg(long, env = "GARUDA_TICKS")]
    pub ticks: Option<u64>,

    /// Seed for reproducible telemetry
    #[arg(long, env = "GARUDA_SEED")]
    pub seed: Option<u64>,

    /// How alert severities are drawn
    #[arg(
        long,
        env = "GARUDA_SEVERITY_MODEL",
        value_enum,
        default_value_t = SeverityModel::Uniform
    )]
    pub severity_model: SeverityModel,

    /// Export the record store as JSON into this directory on shutdown
    #[arg(long, env = "GARUDA_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Include the operation log in the export
    #[arg(long)]
    pub include_log: bool,

    /// Log ticks only, without printing the dashboard
    #[arg(long)]
    pub quiet: bool,
}

impl Config {
    /// Parse from the command line, with `.env` values as fallbacks.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        let config = Config::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&self.interval_secs) {
            return Err(GarudaError::ConfigError(format!(
                "interval must be between {} and {} seconds, got {}",
                MIN_INTERVAL_SECS, MAX_INTERVAL_SECS, self.interval_secs
            )));
        }
        if self.ticks == Some(0) {
            return Err(GarudaError::ConfigError("tick limit must be positive".to_string()));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
