//! Contract for protocol-level directive evaluation.
//!
//! The admission decision never parses `Cache-Control`, `Expires` or `Pragma`
//! on its own. It asks a [`DirectiveOracle`] for a [`Verdict`] and combines it
//! with the operator's rules.
//!
//! Any closure with the right signature is an oracle, which keeps tests free
//! of a full RFC 7234 evaluator:
//!
//! ```
//! use cachegate_core::{DirectiveOracle, ForbiddingReason, OracleError, Verdict};
//! use chrono::{DateTime, Utc};
//! use http::{HeaderMap, Request, StatusCode, request::Parts};
//!
//! let forbid_all = |_: DateTime<Utc>, _: &Parts, _: StatusCode, _: &HeaderMap, _: bool| -> Result<Verdict, OracleError> {
//!     Ok(Verdict::forbidden([ForbiddingReason::ResponseNoStore]))
//! };
//!
//! let (request, ()) = Request::get("/").body(()).unwrap().into_parts();
//! let verdict = forbid_all
//!     .evaluate(Utc::now(), &request, StatusCode::OK, &HeaderMap::new(), false)
//!     .unwrap();
//! assert!(!verdict.is_storable());
//! ```

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use http::{HeaderMap, StatusCode, request::Parts};
use thiserror::Error;

/// Protocol reason that forbids storing an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ForbiddingReason {
    /// Request method is not cacheable.
    RequestMethod,
    /// Request carries `Cache-Control: no-store`.
    RequestNoStore,
    /// Request is authorized and the response does not allow shared storage.
    RequestAuthorization,
    /// Response carries `Cache-Control: no-store`.
    ResponseNoStore,
    /// Response is `private` and the cache is shared.
    ResponsePrivate,
    /// Status code is not cacheable by default and no explicit freshness is given.
    ResponseUncacheableByDefault,
}

impl fmt::Display for ForbiddingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ForbiddingReason::RequestMethod => "request method is not cacheable",
            ForbiddingReason::RequestNoStore => "request no-store",
            ForbiddingReason::RequestAuthorization => "authorized request",
            ForbiddingReason::ResponseNoStore => "response no-store",
            ForbiddingReason::ResponsePrivate => "response private",
            ForbiddingReason::ResponseUncacheableByDefault => {
                "status is not cacheable by default"
            }
        };
        f.write_str(reason)
    }
}

/// Result of evaluating protocol directives for one exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    /// Reasons the exchange must not be stored. Empty means storable.
    pub forbidding: BTreeSet<ForbiddingReason>,
    /// Candidate expiration derived from the directives.
    ///
    /// `None` means the directives carry no freshness information. Oracles may
    /// also return a timestamp in the past (for example the Unix epoch); the
    /// admission decision treats that the same way.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Verdict {
    /// Storable verdict with an explicit expiration.
    pub fn fresh_until(expires_at: DateTime<Utc>) -> Self {
        Self {
            forbidding: BTreeSet::new(),
            expires_at: Some(expires_at),
        }
    }

    /// Verdict forbidding storage for the given reasons.
    pub fn forbidden(reasons: impl IntoIterator<Item = ForbiddingReason>) -> Self {
        Self {
            forbidding: reasons.into_iter().collect(),
            expires_at: None,
        }
    }

    /// Returns `true` when no reason forbids storage.
    pub fn is_storable(&self) -> bool {
        self.forbidding.is_empty()
    }
}

/// Failure of the directive oracle.
///
/// An oracle error always turns into a non-cacheable outcome. It is never
/// retried: malformed headers stay malformed.
#[derive(Debug, Error)]
pub enum OracleError {
    /// A directive carries a value that cannot be parsed.
    #[error("malformed `{directive}` directive value `{value}`")]
    MalformedDirective {
        /// Directive name, e.g. `max-age`.
        directive: String,
        /// Offending raw value.
        value: String,
    },

    /// A header value is not visible ASCII.
    #[error("header `{name}` is not valid ASCII")]
    InvalidHeader {
        /// Header name.
        name: String,
    },

    /// Any other failure of a third-party oracle.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Evaluates protocol cache directives for a request/response pair.
///
/// # For Implementors
///
/// Implementations must be pure over their inputs: no I/O, no retained state
/// between calls, and no clock of their own. Relative lifetimes are resolved
/// against `now`, the instant the decision was taken. `shared_cache` selects
/// shared-cache semantics (`s-maxage`, `private`, `Authorization`).
///
/// Closures of the form
/// `Fn(DateTime<Utc>, &Parts, StatusCode, &HeaderMap, bool) -> Result<Verdict, OracleError>`
/// implement this trait automatically.
pub trait DirectiveOracle {
    /// Evaluates the directives of an exchange.
    fn evaluate(
        &self,
        now: DateTime<Utc>,
        request: &Parts,
        status: StatusCode,
        headers: &HeaderMap,
        shared_cache: bool,
    ) -> Result<Verdict, OracleError>;
}

impl<F> DirectiveOracle for F
where
    F: Fn(DateTime<Utc>, &Parts, StatusCode, &HeaderMap, bool) -> Result<Verdict, OracleError>,
{
    fn evaluate(
        &self,
        now: DateTime<Utc>,
        request: &Parts,
        status: StatusCode,
        headers: &HeaderMap,
        shared_cache: bool,
    ) -> Result<Verdict, OracleError> {
        self(now, request, status, headers, shared_cache)
    }
}
