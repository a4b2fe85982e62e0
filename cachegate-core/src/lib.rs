#![warn(missing_docs)]
//! # cachegate-core
//!
//! Decides whether an HTTP exchange may be stored by a cache and when the
//! stored copy becomes stale.
//!
//! The decision reconciles two independent sources of truth:
//!
//! - **Protocol semantics**, evaluated by a [`DirectiveOracle`] (`Cache-Control`,
//!   `Expires`, `Pragma` and friends). The core consumes the oracle's verdict and
//!   never parses directives itself.
//! - **Operator rules** ([`Rule`]), path prefixes and response header values that
//!   grant caching regardless of protocol freshness.
//!
//! ## Flow
//!
//! ```text
//! request filter -> oracle -> Vary check -> rules -> expiration -> Decision
//! ```
//!
//! Every step is synchronous and side-effect free. A [`Policy`] is built once
//! and shared across threads; a [`Decision`] lives for one request/response pair.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use cachegate_core::{Decision, OracleError, Policy, Rule, Verdict, decide};
//! use chrono::{DateTime, Utc};
//! use http::{HeaderMap, Request, StatusCode, request::Parts};
//!
//! let policy = Policy::builder()
//!     .default_max_age(Duration::from_secs(60))
//!     .rule(Rule::path("/api"))
//!     .build();
//!
//! // Oracle that never finds freshness information.
//! let oracle = |_: DateTime<Utc>, _: &Parts, _: StatusCode, _: &HeaderMap, _: bool| -> Result<Verdict, OracleError> {
//!     Ok(Verdict::default())
//! };
//!
//! let (request, ()) = Request::get("/api/users").body(()).unwrap().into_parts();
//! let decision = decide(&request, StatusCode::OK, &HeaderMap::new(), &policy, &oracle).unwrap();
//! assert!(matches!(decision, Decision::Cacheable { .. }));
//! ```

pub mod decision;
pub mod filter;
pub mod oracle;
pub mod policy;
pub mod rule;

pub use decision::{Decision, Rejection, decide, decide_at};
pub use filter::admissible;
pub use oracle::{DirectiveOracle, ForbiddingReason, OracleError, Verdict};
pub use policy::{DEFAULT_MAX_AGE, Policy, PolicyBuilder};
pub use rule::{Rule, RuleSet};
