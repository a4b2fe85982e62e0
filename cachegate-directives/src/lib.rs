//! # cachegate-directives
//!
//! RFC 7234 evaluation of HTTP cache directives, packaged as a
//! [`DirectiveOracle`](cachegate_core::DirectiveOracle) for
//! [`cachegate_core::decide`].
//!
//! - [`CacheControl`] parses `Cache-Control` header values.
//! - [`Rfc7234Oracle`] turns request and response headers into a
//!   [`Verdict`](cachegate_core::Verdict): the reasons forbidding storage and
//!   the freshness expiration.

mod cache_control;
mod oracle;

pub use cache_control::CacheControl;
pub use oracle::{CACHEABLE_BY_DEFAULT, Rfc7234Oracle};
