pub mod delegation;
mod env_overrides;
pub mod log;

use config::{Config, File, FileFormat, FileSourceFile};
use envconfig::Envconfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::{
    delegation::DelegationConfig,
    env_overrides::{EnvVarOverrides, EnvVarOverridesError},
    log::LoggingConfig,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WrappingConfig {
    /// The logger configuration.
    #[serde(default)]
    pub log: LoggingConfig,

    /// Configuration for delegating fields to source schemas.
    #[serde(default)]
    pub delegation: DelegationConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum WrappingConfigError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
    #[error("Failed to apply configuration overrides: {0}")]
    EnvVarOverridesError(#[from] EnvVarOverridesError),
    #[error("Failed to load the environment variables: {0}")]
    EnvVarLoadError(#[from] envconfig::Error),
    #[error("Failed to parse the configuration file path: {0}")]
    ConfigPathParseError(Infallible),
}

static DEFAULT_FILE_NAMES: &[&str] = &[
    "wrapping.config.yaml",
    "wrapping.config.yml",
    "wrapping.config.json",
    "wrapping.config.json5",
];

pub fn load_config(
    overide_config_path: Option<String>,
) -> Result<WrappingConfig, WrappingConfigError> {
    let env_overrides = EnvVarOverrides::init_from_env()?;
    let mut config = Config::builder();

    if let Some(path_str) = overide_config_path {
        let path_buf = path_str
            .parse::<std::path::PathBuf>()
            .map_err(WrappingConfigError::ConfigPathParseError)?;
        let as_file: File<FileSourceFile, _> = path_buf.into();

        config = config.add_source(as_file.required(true));
    } else {
        for name in DEFAULT_FILE_NAMES {
            config = config.add_source(File::with_name(name).required(false));
        }
    }

    config = env_overrides.apply_overrides(config)?;

    Ok(config.build()?.try_deserialize::<WrappingConfig>()?)
}

pub fn parse_yaml_config(config_raw: &str) -> Result<WrappingConfig, WrappingConfigError> {
    Config::builder()
        .add_source(File::from_str(config_raw, FileFormat::Yaml))
        .build()?
        .try_deserialize::<WrappingConfig>()
        .map_err(WrappingConfigError::ConfigLoadError)
}
