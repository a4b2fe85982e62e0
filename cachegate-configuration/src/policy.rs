use std::time::Duration;

use cachegate_core::{DEFAULT_MAX_AGE, Policy};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::RuleConfig;

fn default_max_age() -> Duration {
    DEFAULT_MAX_AGE
}

/// Deserializable form of a [`Policy`].
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct ConfigPolicy {
    /// Lifetime used when caching is justified without explicit freshness
    /// (e.g., "30s", "5m", "1h"). Defaults to five minutes.
    #[serde(default = "default_max_age", with = "humantime_serde")]
    pub default_max_age: Duration,
    /// Admission rules, evaluated in order.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl Default for ConfigPolicy {
    fn default() -> Self {
        Self {
            default_max_age: DEFAULT_MAX_AGE,
            rules: Vec::new(),
        }
    }
}

impl ConfigPolicy {
    /// Deserializes a policy from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))
    }

    /// Validates the configuration and builds the immutable [`Policy`].
    pub fn into_policy(self) -> Result<Policy, ConfigError> {
        let mut rules = Vec::new();
        for rule in self.rules {
            rules.extend(rule.into_rules()?);
        }
        Ok(Policy::builder()
            .default_max_age(self.default_max_age)
            .rules(rules)
            .build())
    }
}

impl TryFrom<ConfigPolicy> for Policy {
    type Error = ConfigError;

    fn try_from(config: ConfigPolicy) -> Result<Self, Self::Error> {
        config.into_policy()
    }
}
