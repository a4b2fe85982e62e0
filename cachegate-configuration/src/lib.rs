//! YAML configuration for cachegate.
//!
//! Deserializes a [`ConfigPolicy`] and turns it into an immutable
//! [`Policy`](cachegate_core::Policy):
//!
//! ```yaml
//! default_max_age: 5m
//! rules:
//!   - Path: /static
//!   - Path:
//!       in: ["/api/v1", "/api/v2"]
//!   - Header:
//!       Content-Type: ["image/png", "image/jpeg"]
//!       X-Cache-Me: "yes"
//! ```

pub mod error;
pub mod policy;
pub mod rules;

pub use error::ConfigError;
pub use policy::ConfigPolicy;
pub use rules::{HeaderOperation, HeaderValues, PathOperation, RuleConfig};
