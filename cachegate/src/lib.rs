#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # cachegate
//!
//! Decides whether an HTTP exchange may be stored by a cache, and until when.
//!
//! [`Admission`] bundles an immutable [`Policy`] with a directive oracle
//! ([`Rfc7234Oracle`] by default) and exposes a single
//! [`decide`](Admission::decide) call:
//!
//! ```
//! use cachegate::{Admission, Policy, Rule};
//! use http::{HeaderMap, Request, StatusCode};
//! use std::time::Duration;
//!
//! let admission = Admission::new(
//!     Policy::builder()
//!         .default_max_age(Duration::from_secs(60))
//!         .rule(Rule::path("/api"))
//!         .build(),
//! );
//!
//! let (request, ()) = Request::head("/api/x").body(()).unwrap().into_parts();
//! let decision = admission.decide(&request, StatusCode::OK, &HeaderMap::new()).unwrap();
//! assert!(decision.is_cacheable());
//! ```
//!
//! ## Feature Flags
//!
//! - `configuration` (default) - build an [`Admission`] from YAML

mod admission;

pub use admission::Admission;

pub use cachegate_core::{
    DEFAULT_MAX_AGE, Decision, DirectiveOracle, ForbiddingReason, OracleError, Policy,
    PolicyBuilder, Rejection, Rule, RuleSet, Verdict, admissible, decide, decide_at,
};
pub use cachegate_directives::{CacheControl, Rfc7234Oracle};

/// YAML policy configuration.
///
/// Re-exports [`cachegate-configuration`](cachegate_configuration).
#[cfg(feature = "configuration")]
#[cfg_attr(docsrs, doc(cfg(feature = "configuration")))]
pub mod configuration {
    pub use cachegate_configuration::*;
}

/// The `cachegate` prelude.
///
/// ```rust
/// use cachegate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Admission, Decision, DirectiveOracle, Policy, Rule};
}
