use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use proptest::test_runner::Config as ProptestConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable naming an optional configuration file
pub const CONFIG_FILE_VAR: &str = "MOCKPROP_CONFIG";

/// Prefix of environment overrides, e.g. `MOCKPROP_PROPERTY__TRIES=50`
pub const ENV_PREFIX: &str = "MOCKPROP";

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub property: PropertyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PropertyConfig {
    /// Number of successful trials required per property
    pub tries: u32,
    /// Upper bound on shrinking trials after a failure
    pub max_shrink_iters: u32,
    /// Rejected trials tolerated before the run is aborted
    pub max_global_rejects: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json, compact)
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            property: PropertyConfig {
                tries: 1000,
                max_shrink_iters: 1000,
                max_global_rejects: 5000,
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: LogFormat::Compact,
            },
        }
    }
}

impl RunnerConfig {
    /// Load configuration from the embedded defaults, an optional file named
    /// by `MOCKPROP_CONFIG`, and `MOCKPROP_` environment overrides
    pub fn from_env() -> Result<Self> {
        let mut builder = ConfigBuilder::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Ok(config_file) = env::var(CONFIG_FILE_VAR) {
            builder = builder.add_source(
                File::with_name(&config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        builder = builder.add_source(Self::environment());

        builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Load configuration from a specific file on top of the defaults
    pub fn from_file(path: &str) -> Result<Self> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::with_name(path).format(FileFormat::Toml))
            .add_source(Self::environment())
            .build()
            .context("Failed to build configuration from file")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration from file")
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Proptest configuration for the property runner.
    ///
    /// Failure persistence is disabled: properties that use mocks are not
    /// replayable from a regression file.
    pub fn proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.property.tries,
            max_shrink_iters: self.property.max_shrink_iters,
            max_global_rejects: self.property.max_global_rejects,
            failure_persistence: None,
            ..ProptestConfig::default()
        }
    }
}
