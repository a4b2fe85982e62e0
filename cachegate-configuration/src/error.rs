use thiserror::Error;

/// Errors raised while turning configuration into a policy.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid YAML or does not fit the policy schema.
    #[error("failed to parse configuration: {0}")]
    Yaml(String),

    /// A header rule names a header that is not a valid HTTP header name.
    #[error("invalid header name '{0}': {1}")]
    InvalidHeaderName(String, #[source] http::header::InvalidHeaderName),

    /// A `Path: { in: [] }` entry lists no prefixes.
    #[error("path rule list is empty")]
    EmptyPathList,

    /// A header rule lists no accepted values.
    #[error("header rule '{0}' has no values")]
    EmptyHeaderValues(String),
}
