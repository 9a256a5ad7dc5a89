use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};
use std::path::Path;

/// Prefix for environment overrides, e.g. `SENTIMENT_BACKTEST__MIN_TRADING_DAYS=30`.
pub const ENV_PREFIX: &str = "SENTIMENT_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from `config/Config.toml`, `config/Config.json` and the environment.
    ///
    /// Missing files fall back to the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be parsed or the merged configuration is invalid.
    pub fn load() -> Result<AppConfig> {
        Self::extract(
            Self::base()
                .merge(Toml::file("config/Config.toml"))
                .join(Json::file("config/Config.json"))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Loads configuration with a specific profile layered over the base file.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be parsed or the merged configuration is invalid.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig> {
        Self::extract(
            Self::base()
                .merge(Toml::file("config/Config.toml"))
                .merge(Toml::file(format!("config/Config.{profile}.toml")))
                .join(Json::file("config/Config.json"))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Loads configuration from an explicit TOML file plus the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the merged configuration is invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        Self::extract(
            Self::base()
                .merge(Toml::file(path.as_ref()))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    // Defaults come from the serde attributes, so a table given in a file
    // (such as the weight profile) replaces the default table instead of
    // being merged key by key into it.
    fn base() -> Figment {
        Figment::new()
    }

    fn extract(figment: Figment) -> Result<AppConfig> {
        let config: AppConfig = figment
            .extract()
            .context("Failed to parse configuration")?;

        config.validate().context("Invalid configuration")?;

        tracing::debug!(
            sources = config.scoring.weights.len(),
            interval_days = config.backtest.evaluation_interval_days,
            "Configuration loaded"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_from_merges_file_over_defaults() {
        let file = write_config(
            r#"
            [backtest]
            evaluation_interval_days = 5
            min_trading_days = 30

            [scoring.thresholds]
            min_buzz_for_strong_buy = 20
            "#,
        );

        let config = ConfigLoader::load_from(file.path()).unwrap();

        assert_eq!(config.backtest.evaluation_interval_days, 5);
        assert_eq!(config.backtest.min_trading_days, 30);
        assert_eq!(config.scoring.thresholds.min_buzz_for_strong_buy, 20);
        assert_eq!(config.screening.max_concurrent_tickers, 4);
    }

    #[test]
    fn load_from_replaces_weight_table() {
        let file = write_config(
            r#"
            [scoring.weights]
            analyst = 0.5
            news = 0.3
            social = 0.2
            "#,
        );

        let config = ConfigLoader::load_from(file.path()).unwrap();
        let weights = &config.scoring.weights;

        assert_eq!(weights.weight("analyst"), Some(0.5));
        assert_eq!(weights.weight("news"), Some(0.3));
        assert_eq!(weights.weight("social"), Some(0.2));
    }

    #[test]
    fn load_from_rejects_invalid_thresholds() {
        let file = write_config(
            r#"
            [scoring.thresholds]
            sell = 80.0
            "#,
        );

        let err = ConfigLoader::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let config = ConfigLoader::load_from("does/not/exist.toml").unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
