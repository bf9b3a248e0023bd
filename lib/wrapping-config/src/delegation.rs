use std::{str::FromStr, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DelegationConfig {
    /// How a transform path is resolved when several sibling fields share the same name.
    ///
    /// - `first_match`: the first field in document order is used.
    /// - `unique`: the delegation fails with an ambiguous path error.
    ///
    /// Default: `first_match`.
    #[serde(default)]
    pub path_policy: PathPolicy,

    /// The maximum time to wait for a source schema to respond to a delegated operation.
    /// When the timeout is reached, the dispatch is dropped and the delegation fails.
    ///
    /// Unset by default, which leaves timeouts to the transport.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "humantime_serde"
    )]
    #[schemars(with = "Option<String>")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PathPolicy {
    #[default]
    FirstMatch,
    Unique,
}

impl PathPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathPolicy::FirstMatch => "first_match",
            PathPolicy::Unique => "unique",
        }
    }
}

impl FromStr for PathPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first_match" => Ok(PathPolicy::FirstMatch),
            "unique" => Ok(PathPolicy::Unique),
            _ => Err(format!("Invalid path policy: {}", s)),
        }
    }
}
