use std::collections::BTreeSet;

use cachegate_core::{DirectiveOracle, ForbiddingReason, OracleError, Verdict};
use chrono::{DateTime, TimeDelta, Utc};
use http::header::{AUTHORIZATION, CACHE_CONTROL, DATE, EXPIRES, HeaderName, LAST_MODIFIED, PRAGMA};
use http::{HeaderMap, Method, StatusCode, request::Parts};
use tracing::trace;

use crate::cache_control::CacheControl;

/// Status codes a cache may store without explicit freshness (RFC 7231 §6.1).
pub const CACHEABLE_BY_DEFAULT: [StatusCode; 11] = [
    StatusCode::OK,
    StatusCode::NON_AUTHORITATIVE_INFORMATION,
    StatusCode::NO_CONTENT,
    StatusCode::PARTIAL_CONTENT,
    StatusCode::MULTIPLE_CHOICES,
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::NOT_FOUND,
    StatusCode::METHOD_NOT_ALLOWED,
    StatusCode::GONE,
    StatusCode::URI_TOO_LONG,
    StatusCode::NOT_IMPLEMENTED,
];

/// Directive oracle following RFC 7234.
///
/// Reads `Cache-Control`, `Pragma`, `Expires`, `Date`, `Last-Modified` and
/// `Authorization`. Lifetimes are resolved against the `now` handed in by the
/// decision. Freshness is resolved in this order:
///
/// 1. `no-cache` (or `Pragma: no-cache` without `Cache-Control`): never fresh;
/// 2. `s-maxage` (shared caches only);
/// 3. `max-age`;
/// 4. `Expires`, relative to `Date` when present. An unparsable `Expires`
///    means already expired;
/// 5. a heuristic of 10% of the time since `Last-Modified`, for status codes
///    that are cacheable by default.
///
/// # Examples
///
/// ```
/// use cachegate_core::DirectiveOracle;
/// use cachegate_directives::Rfc7234Oracle;
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use http::{HeaderMap, HeaderValue, Request, StatusCode, header::CACHE_CONTROL};
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let oracle = Rfc7234Oracle::new();
///
/// let (request, ()) = Request::get("/").body(()).unwrap().into_parts();
/// let mut headers = HeaderMap::new();
/// headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=120"));
///
/// let verdict = oracle.evaluate(now, &request, StatusCode::OK, &headers, false).unwrap();
/// assert!(verdict.is_storable());
/// assert_eq!(verdict.expires_at, Some(now + TimeDelta::seconds(120)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rfc7234Oracle;

impl Rfc7234Oracle {
    /// Creates the oracle.
    pub fn new() -> Self {
        Self
    }

    fn forbidding(
        request: &Parts,
        request_cc: &CacheControl,
        status: StatusCode,
        headers: &HeaderMap,
        response_cc: &CacheControl,
        shared_cache: bool,
    ) -> BTreeSet<ForbiddingReason> {
        let mut reasons = BTreeSet::new();

        if request.method != Method::GET && request.method != Method::HEAD {
            reasons.insert(ForbiddingReason::RequestMethod);
        }
        if request_cc.no_store {
            reasons.insert(ForbiddingReason::RequestNoStore);
        }
        if response_cc.no_store {
            reasons.insert(ForbiddingReason::ResponseNoStore);
        }
        if shared_cache && response_cc.private {
            reasons.insert(ForbiddingReason::ResponsePrivate);
        }
        if shared_cache
            && request.headers.contains_key(AUTHORIZATION)
            && !response_cc.public
            && !response_cc.must_revalidate
            && response_cc.s_maxage.is_none()
        {
            reasons.insert(ForbiddingReason::RequestAuthorization);
        }

        let explicit = headers.contains_key(EXPIRES)
            || response_cc.max_age.is_some()
            || (shared_cache && response_cc.s_maxage.is_some())
            || response_cc.public;
        if !CACHEABLE_BY_DEFAULT.contains(&status) && !explicit {
            reasons.insert(ForbiddingReason::ResponseUncacheableByDefault);
        }

        reasons
    }

    fn expiration(
        now: DateTime<Utc>,
        status: StatusCode,
        headers: &HeaderMap,
        response_cc: &CacheControl,
        shared_cache: bool,
    ) -> Result<Option<DateTime<Utc>>, OracleError> {
        let no_cache = response_cc.no_cache
            || (!headers.contains_key(CACHE_CONTROL) && pragma_no_cache(headers));
        if no_cache {
            return Ok(Some(now));
        }

        let lifetime = response_cc
            .s_maxage
            .filter(|_| shared_cache)
            .or(response_cc.max_age);
        if let Some(lifetime) = lifetime {
            return Ok(Some(add(now, TimeDelta::from_std(lifetime).ok())));
        }

        let date = http_date(headers, DATE)?;

        if headers.contains_key(EXPIRES) {
            let Some(expires) = http_date(headers, EXPIRES)? else {
                trace!("unparsable Expires, treating as already expired");
                return Ok(Some(DateTime::<Utc>::UNIX_EPOCH));
            };
            return Ok(Some(match date {
                Some(date) => add(now, Some(expires - date)),
                None => expires,
            }));
        }

        if CACHEABLE_BY_DEFAULT.contains(&status)
            && let Some(last_modified) = http_date(headers, LAST_MODIFIED)?
        {
            let age = date.unwrap_or(now) - last_modified;
            if age > TimeDelta::zero() {
                trace!(?age, "heuristic freshness from Last-Modified");
                return Ok(Some(add(now, Some(age / 10))));
            }
        }

        Ok(None)
    }
}

impl DirectiveOracle for Rfc7234Oracle {
    fn evaluate(
        &self,
        now: DateTime<Utc>,
        request: &Parts,
        status: StatusCode,
        headers: &HeaderMap,
        shared_cache: bool,
    ) -> Result<Verdict, OracleError> {
        let request_cc = CacheControl::from_headers(&request.headers)?;
        let response_cc = CacheControl::from_headers(headers)?;

        let forbidding = Self::forbidding(
            request,
            &request_cc,
            status,
            headers,
            &response_cc,
            shared_cache,
        );
        let expires_at = Self::expiration(now, status, headers, &response_cc, shared_cache)?;

        trace!(?forbidding, ?expires_at, "directives evaluated");
        Ok(Verdict {
            forbidding,
            expires_at,
        })
    }
}

fn pragma_no_cache(headers: &HeaderMap) -> bool {
    headers.get_all(PRAGMA).iter().any(|value| {
        value
            .to_str()
            .map(|v| v.split(',').any(|d| d.trim().eq_ignore_ascii_case("no-cache")))
            .unwrap_or(false)
    })
}

/// Parses the first value of a date header.
///
/// `Ok(None)` when the header is absent or not a valid HTTP date; an error
/// only when the value is not ASCII.
fn http_date(headers: &HeaderMap, name: HeaderName) -> Result<Option<DateTime<Utc>>, OracleError> {
    let Some(value) = headers.get(&name) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| OracleError::InvalidHeader {
        name: name.to_string(),
    })?;
    Ok(httpdate::parse_http_date(value).ok().map(DateTime::<Utc>::from))
}

fn add(now: DateTime<Utc>, delta: Option<TimeDelta>) -> DateTime<Utc> {
    delta
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use http::{HeaderValue, Request};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn get() -> Parts {
        Request::get("/").body(()).unwrap().into_parts().0
    }

    fn response(pairs: &[(HeaderName, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(name.clone(), HeaderValue::from_static(value));
        }
        headers
    }

    fn evaluate(request: &Parts, status: StatusCode, headers: &HeaderMap, shared: bool) -> Verdict {
        Rfc7234Oracle::new()
            .evaluate(now(), request, status, headers, shared)
            .unwrap()
    }

    #[test]
    fn test_plain_ok_has_no_freshness() {
        let verdict = evaluate(&get(), StatusCode::OK, &HeaderMap::new(), false);
        assert_eq!(verdict, Verdict::default());
    }

    #[test]
    fn test_max_age() {
        let headers = response(&[(CACHE_CONTROL, "max-age=120")]);
        let verdict = evaluate(&get(), StatusCode::OK, &headers, false);
        assert_eq!(verdict.expires_at, Some(now() + TimeDelta::seconds(120)));
    }

    #[test]
    fn test_s_maxage_only_for_shared_caches() {
        let headers = response(&[(CACHE_CONTROL, "max-age=60, s-maxage=600")]);
        let private = evaluate(&get(), StatusCode::OK, &headers, false);
        let shared = evaluate(&get(), StatusCode::OK, &headers, true);
        assert_eq!(private.expires_at, Some(now() + TimeDelta::seconds(60)));
        assert_eq!(shared.expires_at, Some(now() + TimeDelta::seconds(600)));
    }

    #[test]
    fn test_no_store_on_request_and_response() {
        let (request, ()) = Request::get("/")
            .header(CACHE_CONTROL, "no-store")
            .body(())
            .unwrap()
            .into_parts();
        let headers = response(&[(CACHE_CONTROL, "no-store, max-age=60")]);
        let verdict = evaluate(&request, StatusCode::OK, &headers, false);
        assert_eq!(
            verdict.forbidding,
            BTreeSet::from([ForbiddingReason::RequestNoStore, ForbiddingReason::ResponseNoStore])
        );
    }

    #[test]
    fn test_private_only_forbidden_for_shared_caches() {
        let headers = response(&[(CACHE_CONTROL, "private, max-age=60")]);
        assert!(evaluate(&get(), StatusCode::OK, &headers, false).is_storable());
        assert_eq!(
            evaluate(&get(), StatusCode::OK, &headers, true).forbidding,
            BTreeSet::from([ForbiddingReason::ResponsePrivate])
        );
    }

    #[test]
    fn test_authorization_in_shared_cache() {
        let (request, ()) = Request::get("/")
            .header(AUTHORIZATION, "Bearer token")
            .body(())
            .unwrap()
            .into_parts();
        let headers = response(&[(CACHE_CONTROL, "max-age=60")]);
        assert!(evaluate(&request, StatusCode::OK, &headers, false).is_storable());
        assert_eq!(
            evaluate(&request, StatusCode::OK, &headers, true).forbidding,
            BTreeSet::from([ForbiddingReason::RequestAuthorization])
        );

        let headers = response(&[(CACHE_CONTROL, "public, max-age=60")]);
        assert!(evaluate(&request, StatusCode::OK, &headers, true).is_storable());
    }

    #[test]
    fn test_post_is_forbidden() {
        let (request, ()) = Request::post("/").body(()).unwrap().into_parts();
        let verdict = evaluate(&request, StatusCode::OK, &HeaderMap::new(), false);
        assert_eq!(verdict.forbidding, BTreeSet::from([ForbiddingReason::RequestMethod]));
    }

    #[test]
    fn test_status_not_cacheable_by_default() {
        let verdict = evaluate(&get(), StatusCode::INTERNAL_SERVER_ERROR, &HeaderMap::new(), false);
        assert_eq!(
            verdict.forbidding,
            BTreeSet::from([ForbiddingReason::ResponseUncacheableByDefault])
        );

        let headers = response(&[(CACHE_CONTROL, "max-age=5")]);
        assert!(evaluate(&get(), StatusCode::INTERNAL_SERVER_ERROR, &headers, false).is_storable());
    }

    #[test]
    fn test_zero_max_age_expires_at_given_instant() {
        let headers = response(&[(CACHE_CONTROL, "max-age=0")]);
        let verdict = evaluate(&get(), StatusCode::OK, &headers, false);
        assert_eq!(verdict.expires_at, Some(now()));
    }

    #[test]
    fn test_no_cache_is_never_fresh() {
        let headers = response(&[(CACHE_CONTROL, "no-cache, max-age=600")]);
        let verdict = evaluate(&get(), StatusCode::OK, &headers, false);
        assert_eq!(verdict.expires_at, Some(now()));
    }

    #[test]
    fn test_pragma_no_cache_without_cache_control() {
        let headers = response(&[(PRAGMA, "no-cache"), (EXPIRES, "Thu, 01 May 2025 12:00:00 GMT")]);
        let verdict = evaluate(&get(), StatusCode::OK, &headers, false);
        assert_eq!(verdict.expires_at, Some(now()));

        let headers = response(&[(PRAGMA, "no-cache"), (CACHE_CONTROL, "max-age=60")]);
        let verdict = evaluate(&get(), StatusCode::OK, &headers, false);
        assert_eq!(verdict.expires_at, Some(now() + TimeDelta::seconds(60)));
    }

    #[test]
    fn test_expires_relative_to_date() {
        let headers = response(&[
            (DATE, "Wed, 01 May 2024 11:00:00 GMT"),
            (EXPIRES, "Wed, 01 May 2024 11:30:00 GMT"),
        ]);
        let verdict = evaluate(&get(), StatusCode::OK, &headers, false);
        assert_eq!(verdict.expires_at, Some(now() + TimeDelta::minutes(30)));
    }

    #[test]
    fn test_expires_absolute_without_date() {
        let headers = response(&[(EXPIRES, "Wed, 01 May 2024 13:00:00 GMT")]);
        let verdict = evaluate(&get(), StatusCode::OK, &headers, false);
        assert_eq!(verdict.expires_at, Some(now() + TimeDelta::hours(1)));
    }

    #[test]
    fn test_invalid_expires_is_already_expired() {
        let headers = response(&[(EXPIRES, "0")]);
        let verdict = evaluate(&get(), StatusCode::OK, &headers, false);
        assert!(verdict.is_storable());
        assert_eq!(verdict.expires_at, Some(DateTime::<Utc>::UNIX_EPOCH));
    }

    #[test]
    fn test_last_modified_heuristic() {
        let headers = response(&[
            (DATE, "Wed, 01 May 2024 12:00:00 GMT"),
            (LAST_MODIFIED, "Mon, 22 Apr 2024 00:00:00 GMT"),
        ]);
        let verdict = evaluate(&get(), StatusCode::OK, &headers, false);
        // Ten percent of 9.5 days.
        assert_eq!(verdict.expires_at, Some(now() + TimeDelta::seconds(82_080)));

        let verdict = evaluate(&get(), StatusCode::FOUND, &headers, false);
        assert_eq!(verdict.expires_at, None);
    }

    #[test]
    fn test_malformed_max_age_is_an_error() {
        let headers = response(&[(CACHE_CONTROL, "max-age=tomorrow")]);
        let result = Rfc7234Oracle::new().evaluate(now(), &get(), StatusCode::OK, &headers, false);
        assert!(matches!(result, Err(OracleError::MalformedDirective { .. })));
    }
}
