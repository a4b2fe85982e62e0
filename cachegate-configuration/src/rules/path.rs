//! Path rule configuration.

use cachegate_core::Rule;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Path prefix operation.
///
/// Supports both a single prefix and a list of prefixes:
/// ```yaml
/// # Single prefix
/// - Path: "/static"
///
/// # Multiple prefixes, one rule each
/// - Path:
///     in:
///       - "/api/v1"
///       - "/api/v2"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(untagged)]
pub enum PathOperation {
    /// Single prefix: `Path: "/static"`
    Prefix(String),
    /// Multiple prefixes: `Path: { in: [...] }`
    In { r#in: Vec<String> },
}

impl PathOperation {
    pub fn into_rules(self) -> Result<Vec<Rule>, ConfigError> {
        match self {
            PathOperation::Prefix(prefix) => Ok(vec![Rule::path(prefix)]),
            PathOperation::In { r#in: prefixes } if prefixes.is_empty() => {
                Err(ConfigError::EmptyPathList)
            }
            PathOperation::In { r#in: prefixes } => {
                Ok(prefixes.into_iter().map(Rule::path).collect())
            }
        }
    }
}
