//! The admission decision.
//!
//! [`decide`] combines the request filter, the directive oracle, the `Vary`
//! check and the operator rules into a single [`Decision`]:
//!
//! 1. Requests failing [`admissible`] are rejected without calling the oracle.
//! 2. The oracle is evaluated with private-cache semantics. Errors are
//!    returned as-is; any forbidding reason rejects the exchange.
//! 3. A response whose first `Vary` value is `*` is rejected, whatever the
//!    rules say.
//! 4. An oracle expiration counts as explicit only when it is strictly after
//!    `now`. Past or epoch timestamps mean "no information".
//! 5. Without explicit freshness the expiration falls back to
//!    `now + default_max_age`.
//! 6. The exchange is cacheable when a rule matches **or** freshness is
//!    explicit. The default max-age alone never grants caching.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use http::{HeaderMap, StatusCode, header::VARY, request::Parts};
use tracing::{Span, debug, warn};

use crate::filter::admissible;
use crate::oracle::{DirectiveOracle, ForbiddingReason, OracleError};
use crate::policy::Policy;

/// Why an exchange was not admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Request method or headers exclude caching up front.
    NotAdmissible,
    /// The oracle forbids storage.
    Forbidden(BTreeSet<ForbiddingReason>),
    /// Response declares `Vary: *`.
    VaryWildcard,
    /// No rule matched and the response has no explicit freshness.
    NoFreshness,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotAdmissible => f.write_str("request is not admissible"),
            Rejection::Forbidden(reasons) => {
                f.write_str("forbidden:")?;
                for reason in reasons {
                    write!(f, " {reason};")?;
                }
                Ok(())
            }
            Rejection::VaryWildcard => f.write_str("response varies on *"),
            Rejection::NoFreshness => f.write_str("no matching rule and no explicit freshness"),
        }
    }
}

/// Outcome of an admission decision.
///
/// A cacheable decision always carries its expiration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Exchange may be stored until `expires_at`.
    Cacheable {
        /// Instant the stored copy becomes stale.
        expires_at: DateTime<Utc>,
    },
    /// Exchange must not be stored.
    NonCacheable(Rejection),
}

impl Decision {
    /// Returns `true` for [`Decision::Cacheable`].
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Decision::Cacheable { .. })
    }

    /// Expiration of a cacheable decision.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Decision::Cacheable { expires_at } => Some(*expires_at),
            Decision::NonCacheable(_) => None,
        }
    }

    /// Rejection of a non-cacheable decision.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Decision::Cacheable { .. } => None,
            Decision::NonCacheable(rejection) => Some(rejection),
        }
    }
}

/// Decides whether an exchange may be cached, reading the clock once.
///
/// See the [module documentation](self) for the algorithm. An `Err` is an
/// oracle failure and must be handled as "do not cache".
pub fn decide<O>(
    request: &Parts,
    status: StatusCode,
    headers: &HeaderMap,
    policy: &Policy,
    oracle: &O,
) -> Result<Decision, OracleError>
where
    O: DirectiveOracle + ?Sized,
{
    decide_at(Utc::now(), request, status, headers, policy, oracle)
}

/// Same as [`decide`] with an explicit `now`.
///
/// Identical inputs always produce identical decisions.
#[tracing::instrument(
    level = "debug",
    name = "cachegate.decide",
    skip_all,
    fields(
        method = %request.method,
        path = request.uri.path(),
        status = status.as_u16(),
        cacheable = tracing::field::Empty,
    )
)]
pub fn decide_at<O>(
    now: DateTime<Utc>,
    request: &Parts,
    status: StatusCode,
    headers: &HeaderMap,
    policy: &Policy,
    oracle: &O,
) -> Result<Decision, OracleError>
where
    O: DirectiveOracle + ?Sized,
{
    let decision = evaluate(now, request, status, headers, policy, oracle).inspect_err(|error| {
        warn!(%error, "directive evaluation failed, not caching");
    })?;
    Span::current().record("cacheable", decision.is_cacheable());
    Ok(decision)
}

fn evaluate<O>(
    now: DateTime<Utc>,
    request: &Parts,
    status: StatusCode,
    headers: &HeaderMap,
    policy: &Policy,
    oracle: &O,
) -> Result<Decision, OracleError>
where
    O: DirectiveOracle + ?Sized,
{
    if !admissible(request) {
        debug!("request filtered before directive evaluation");
        return Ok(Decision::NonCacheable(Rejection::NotAdmissible));
    }

    let verdict = oracle.evaluate(now, request, status, headers, false)?;
    if !verdict.is_storable() {
        debug!(reasons = ?verdict.forbidding, "directives forbid storage");
        return Ok(Decision::NonCacheable(Rejection::Forbidden(
            verdict.forbidding,
        )));
    }

    if headers
        .get(VARY)
        .is_some_and(|vary| vary.as_bytes() == b"*")
    {
        debug!("response varies on *");
        return Ok(Decision::NonCacheable(Rejection::VaryWildcard));
    }

    let explicit = verdict.expires_at.filter(|expires_at| *expires_at > now);
    let expires_at = explicit.unwrap_or_else(|| add_max_age(now, policy.default_max_age()));

    let rule = policy.rules().first_match(request, status, headers);
    if rule.is_none() && explicit.is_none() {
        debug!("no rule matched and no explicit freshness");
        return Ok(Decision::NonCacheable(Rejection::NoFreshness));
    }

    debug!(%expires_at, explicit = explicit.is_some(), ?rule, "exchange admitted");
    Ok(Decision::Cacheable { expires_at })
}

/// `now + max_age`, saturating at the largest representable instant.
fn add_max_age(now: DateTime<Utc>, max_age: std::time::Duration) -> DateTime<Utc> {
    TimeDelta::from_std(max_age)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
