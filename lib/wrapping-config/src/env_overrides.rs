use config::{builder::BuilderState, ConfigBuilder, ConfigError};
use envconfig::Envconfig;
use tracing::debug;

use crate::{delegation::PathPolicy, log::LogLevel};

#[derive(Envconfig)]
pub struct EnvVarOverrides {
    // Logger overrides
    #[envconfig(from = "LOG_LEVEL")]
    pub log_level: Option<LogLevel>,
    #[envconfig(from = "LOG_FILTER")]
    pub log_filter: Option<String>,

    // Delegation overrides
    #[envconfig(from = "WRAPPING_PATH_POLICY")]
    pub path_policy: Option<PathPolicy>,
    #[envconfig(from = "WRAPPING_TIMEOUT")]
    pub timeout: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnvVarOverridesError {
    #[error("Failed to override configuration: {0}")]
    FailedToOverrideConfig(#[from] ConfigError),
    #[error("Invalid duration in WRAPPING_TIMEOUT: {0}")]
    InvalidTimeout(#[from] humantime::DurationError),
}

impl EnvVarOverrides {
    pub fn apply_overrides<T: BuilderState>(
        mut self,
        mut config: ConfigBuilder<T>,
    ) -> Result<ConfigBuilder<T>, EnvVarOverridesError> {
        if let Some(log_level) = self.log_level.take() {
            debug!("[config-override] 'log.level' = {:?}", log_level);
            config = config.set_override("log.level", log_level.as_str())?;
        }
        if let Some(log_filter) = self.log_filter.take() {
            debug!("[config-override] 'log.filter' = {:?}", log_filter);
            config = config.set_override("log.filter", log_filter)?;
        }

        if let Some(path_policy) = self.path_policy.take() {
            debug!("[config-override] 'delegation.path_policy' = {:?}", path_policy);
            config = config.set_override("delegation.path_policy", path_policy.as_str())?;
        }
        if let Some(timeout) = self.timeout.take() {
            humantime::parse_duration(&timeout)?;
            debug!("[config-override] 'delegation.timeout' = {}", timeout);
            config = config.set_override("delegation.timeout", timeout)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use config::{Config, File, FileFormat};

    use crate::{
        delegation::PathPolicy,
        env_overrides::{EnvVarOverrides, EnvVarOverridesError},
        log::LogLevel,
        WrappingConfig,
    };

    const FILE_CONFIG: &str = "log:\n  level: info\ndelegation:\n  path_policy: first_match\n  timeout: 5s\n";

    fn no_overrides() -> EnvVarOverrides {
        EnvVarOverrides {
            log_level: None,
            log_filter: None,
            path_policy: None,
            timeout: None,
        }
    }

    fn merged(overrides: EnvVarOverrides) -> Result<WrappingConfig, Box<dyn std::error::Error>> {
        let builder =
            Config::builder().add_source(File::from_str(FILE_CONFIG, FileFormat::Yaml));
        let config = overrides
            .apply_overrides(builder)?
            .build()?
            .try_deserialize::<WrappingConfig>()?;

        Ok(config)
    }

    #[test]
    fn file_values_are_kept_without_overrides() {
        let config = merged(no_overrides()).expect("config to merge");

        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.delegation.path_policy, PathPolicy::FirstMatch);
        assert_eq!(config.delegation.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn env_values_override_the_file() {
        let config = merged(EnvVarOverrides {
            log_level: Some(LogLevel::Debug),
            log_filter: Some("graphql_wrapping=trace".to_string()),
            path_policy: Some(PathPolicy::Unique),
            timeout: Some("250ms".to_string()),
        })
        .expect("config to merge");

        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.filter.as_deref(), Some("graphql_wrapping=trace"));
        assert_eq!(config.log.env_filter_str(), "graphql_wrapping=trace");
        assert_eq!(config.delegation.path_policy, PathPolicy::Unique);
        assert_eq!(config.delegation.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn invalid_timeout_is_rejected_before_merging() {
        let result = EnvVarOverrides {
            timeout: Some("soon".to_string()),
            ..no_overrides()
        }
        .apply_overrides(Config::builder());

        assert!(matches!(result, Err(EnvVarOverridesError::InvalidTimeout(_))));
    }
}
