//! Rule configuration.

mod header;
mod path;

use cachegate_core::Rule;
use serde::{Deserialize, Serialize};

pub use header::{HeaderOperation, HeaderValues};
pub use path::PathOperation;

use crate::error::ConfigError;

// Externally tagged: `- Path: ...`, `- Header: {...}`
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum RuleConfig {
    Path(PathOperation),
    Header(HeaderOperation),
}

impl RuleConfig {
    /// Expands this entry into one or more rules, keeping order.
    pub fn into_rules(self) -> Result<Vec<Rule>, ConfigError> {
        match self {
            RuleConfig::Path(operation) => operation.into_rules(),
            RuleConfig::Header(operation) => header::into_rules(operation),
        }
    }
}
