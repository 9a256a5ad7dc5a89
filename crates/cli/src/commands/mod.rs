//! CLI commands for screening and backtesting.

pub mod backtest;
pub mod screen;
pub mod sources;

pub use backtest::{run_backtest, BacktestArgs};
pub use screen::{run_screen, ScreenArgs};

use anyhow::Result;
use sentiment_trade_core::{AppConfig, ConfigLoader};

/// Where configuration is read from.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigSource<'a> {
    /// Explicit TOML file, replacing the default locations
    pub path: Option<&'a str>,
    /// Profile layered over `config/Config.toml`
    pub profile: Option<&'a str>,
}

/// Loads configuration from an explicit file, a profile, or the default locations.
///
/// # Errors
/// Returns an error if the configuration cannot be parsed or is invalid.
pub fn load_config(source: ConfigSource<'_>) -> Result<AppConfig> {
    match (source.path, source.profile) {
        (Some(path), _) => {
            tracing::info!("Loading configuration from {}", path);
            ConfigLoader::load_from(path)
        }
        (None, Some(profile)) => {
            tracing::info!("Loading configuration profile {}", profile);
            ConfigLoader::load_with_profile(profile)
        }
        (None, None) => ConfigLoader::load(),
    }
}
