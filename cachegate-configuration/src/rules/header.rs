//! Response header rule configuration.

use cachegate_core::Rule;
use http::HeaderName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Accepted values of one header.
///
/// ```yaml
/// X-Cache-Me: "yes"                         # single value
/// Content-Type: ["image/png", "image/gif"]  # any of several values
/// ```
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
#[serde(untagged)]
pub enum HeaderValues {
    One(String),
    Many(Vec<String>),
}

impl HeaderValues {
    fn into_vec(self) -> Vec<String> {
        match self {
            HeaderValues::One(value) => vec![value],
            HeaderValues::Many(values) => values,
        }
    }
}

/// Map of header names to accepted values. Each entry becomes one rule.
pub type HeaderOperation = IndexMap<String, HeaderValues>;

/// Parse a header name string into `HeaderName`.
fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse()
        .map_err(|e| ConfigError::InvalidHeaderName(name.to_string(), e))
}

pub(super) fn into_rules(headers: HeaderOperation) -> Result<Vec<Rule>, ConfigError> {
    headers
        .into_iter()
        .map(|(name, values)| {
            let header_name = parse_header_name(&name)?;
            let values = values.into_vec();
            if values.is_empty() {
                return Err(ConfigError::EmptyHeaderValues(name));
            }
            Ok(Rule::header(header_name, values))
        })
        .collect()
}
