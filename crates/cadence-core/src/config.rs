use std::path::Path;

use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, FileFormat};
use serde::Deserialize;

/// Name of the optional configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

/// Prefix for environment overrides, e.g. `CADENCE_EXPANSION__BATCH_SIZE=60`.
pub const ENV_PREFIX: &str = "CADENCE";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub expansion: ExpansionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Tuning for occurrence expansion.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionConfig {
    /// Base periods generated per refill (the batch holds `batch_size + 1` candidates).
    pub batch_size: u32,
    /// Consecutive empty refills tolerated before a stream gives up.
    /// `None` keeps retrying forever.
    pub max_empty_batches: Option<u32>,
    /// Occurrences printed by the CLI when no `--limit` is given.
    pub default_limit: usize,
    /// IANA zone used when the CLI gets no `--tz`.
    pub timezone: String,
}

impl Settings {
    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .set_default("expansion.batch_size", 30)?
            .set_default("expansion.default_limit", 100)?
            .set_default("expansion.timezone", "UTC")?)
    }

    /// ## Summary
    /// Loads configuration from the defaults, a TOML file and environment variables.
    /// Environment variables take precedence over file values.
    ///
    /// When `path` is `None` the optional `cadence.toml` in the working directory is used.
    ///
    /// ## Errors
    /// Returns an error if an explicitly given file is missing, or if building
    /// or deserializing the configuration fails.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Ok(Self::defaults()?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Builds settings from the defaults overlaid with an inline TOML document.
    ///
    /// ## Errors
    /// Returns an error if the document is not valid TOML or does not deserialize.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(Self::defaults()?
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables, `.env` and `cadence.toml`
/// (or the file at `path`).
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config(path: Option<&Path>) -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load_from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn defaults_apply_to_empty_document() {
        let settings = Settings::from_toml_str("").unwrap();
        tracing::debug!(?settings, "Loaded default settings");

        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.expansion.batch_size, 30);
        assert_eq!(settings.expansion.max_empty_batches, None);
        assert_eq!(settings.expansion.default_limit, 100);
        assert_eq!(settings.expansion.timezone, "UTC");
    }

    #[test]
    fn document_overrides_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [logging]
            level = "trace"

            [expansion]
            batch_size = 7
            max_empty_batches = 500
            timezone = "Europe/Berlin"
            "#,
        )
        .unwrap();

        assert_eq!(settings.logging.level, "trace");
        assert_eq!(settings.expansion.batch_size, 7);
        assert_eq!(settings.expansion.max_empty_batches, Some(500));
        assert_eq!(settings.expansion.default_limit, 100);
        assert_eq!(settings.expansion.timezone, "Europe/Berlin");
    }

    #[test]
    fn wrong_type_is_rejected() {
        let result = Settings::from_toml_str(
            r#"
            [expansion]
            batch_size = "lots"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = Settings::load_from(Some(Path::new("/nonexistent/cadence-test.toml")));
        assert!(result.is_err());
    }
}
