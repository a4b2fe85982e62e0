use std::sync::Arc;

use cachegate_core::{Decision, DirectiveOracle, OracleError, Policy};
use cachegate_directives::Rfc7234Oracle;
use chrono::{DateTime, Utc};
use http::{HeaderMap, StatusCode, request::Parts};

/// A policy paired with the oracle that evaluates protocol directives.
///
/// Cloning is cheap: the policy is shared behind an `Arc`. An `Admission` can
/// be used from many threads at once.
#[derive(Debug, Clone)]
pub struct Admission<O = Rfc7234Oracle> {
    policy: Arc<Policy>,
    oracle: O,
}

impl Admission<Rfc7234Oracle> {
    /// Creates an admission using the RFC 7234 oracle.
    pub fn new(policy: impl Into<Arc<Policy>>) -> Self {
        Self::with_oracle(policy, Rfc7234Oracle::new())
    }

    /// Builds an admission from a YAML policy document.
    #[cfg(feature = "configuration")]
    #[cfg_attr(docsrs, doc(cfg(feature = "configuration")))]
    pub fn from_yaml(yaml: &str) -> Result<Self, cachegate_configuration::ConfigError> {
        let policy = cachegate_configuration::ConfigPolicy::from_yaml(yaml)?.into_policy()?;
        Ok(Self::new(policy))
    }
}

impl<O> Admission<O>
where
    O: DirectiveOracle,
{
    /// Creates an admission with a custom oracle.
    pub fn with_oracle(policy: impl Into<Arc<Policy>>, oracle: O) -> Self {
        Self {
            policy: policy.into(),
            oracle,
        }
    }

    /// The shared policy.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// The directive oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Decides the exchange against the wall clock.
    ///
    /// An `Err` means the directives could not be evaluated; do not cache.
    pub fn decide(
        &self,
        request: &Parts,
        status: StatusCode,
        headers: &HeaderMap,
    ) -> Result<Decision, OracleError> {
        cachegate_core::decide(request, status, headers, &self.policy, &self.oracle)
    }

    /// Decides the exchange at a given instant.
    pub fn decide_at(
        &self,
        now: DateTime<Utc>,
        request: &Parts,
        status: StatusCode,
        headers: &HeaderMap,
    ) -> Result<Decision, OracleError> {
        cachegate_core::decide_at(now, request, status, headers, &self.policy, &self.oracle)
    }
}
