use std::time::Duration;

use cachegate_core::OracleError;
use http::{HeaderMap, header::CACHE_CONTROL};

/// Delta-seconds larger than this are clamped (RFC 7234 §1.2.1).
const DELTA_SECONDS_MAX: u64 = 1 << 31;

/// Parsed `Cache-Control` directives relevant to storage and freshness.
///
/// Unknown extension directives are ignored. Directive names are matched
/// case-insensitively; all `Cache-Control` header lines are combined.
///
/// # Examples
///
/// ```
/// use cachegate_directives::CacheControl;
/// use http::{HeaderMap, HeaderValue, header::CACHE_CONTROL};
/// use std::time::Duration;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CACHE_CONTROL, HeaderValue::from_static("public, max-age=120"));
///
/// let cache_control = CacheControl::from_headers(&headers).unwrap();
/// assert!(cache_control.public);
/// assert_eq!(cache_control.max_age, Some(Duration::from_secs(120)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    /// `no-store`
    pub no_store: bool,
    /// `no-cache`, with or without a field list.
    pub no_cache: bool,
    /// `private`, with or without a field list.
    pub private: bool,
    /// `public`
    pub public: bool,
    /// `must-revalidate`
    pub must_revalidate: bool,
    /// `proxy-revalidate`
    pub proxy_revalidate: bool,
    /// `max-age=N`
    pub max_age: Option<Duration>,
    /// `s-maxage=N`
    pub s_maxage: Option<Duration>,
}

impl CacheControl {
    /// Parses every `Cache-Control` line of `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::InvalidHeader`] for non-ASCII values and
    /// [`OracleError::MalformedDirective`] when `max-age` or `s-maxage` is not
    /// a non-negative integer.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, OracleError> {
        let mut cache_control = CacheControl::default();
        for value in headers.get_all(CACHE_CONTROL) {
            let value = value.to_str().map_err(|_| OracleError::InvalidHeader {
                name: CACHE_CONTROL.to_string(),
            })?;
            for directive in split_directives(value) {
                cache_control.apply(directive)?;
            }
        }
        Ok(cache_control)
    }

    fn apply(&mut self, directive: &str) -> Result<(), OracleError> {
        let (name, value) = match directive.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim().trim_matches('"'))),
            None => (directive, None),
        };

        match name.to_ascii_lowercase().as_str() {
            "no-store" => self.no_store = true,
            "no-cache" => self.no_cache = true,
            "private" => self.private = true,
            "public" => self.public = true,
            "must-revalidate" => self.must_revalidate = true,
            "proxy-revalidate" => self.proxy_revalidate = true,
            "max-age" => self.max_age = Some(delta_seconds("max-age", value)?),
            "s-maxage" => self.s_maxage = Some(delta_seconds("s-maxage", value)?),
            _ => {}
        }
        Ok(())
    }
}

fn delta_seconds(directive: &str, value: Option<&str>) -> Result<Duration, OracleError> {
    let malformed = || OracleError::MalformedDirective {
        directive: directive.to_string(),
        value: value.unwrap_or_default().to_string(),
    };

    let value = value.filter(|v| !v.is_empty()).ok_or_else(malformed)?;
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let seconds = value.parse::<u64>().unwrap_or(DELTA_SECONDS_MAX);
    Ok(Duration::from_secs(seconds.min(DELTA_SECONDS_MAX)))
}

/// Splits a header value on commas that are not inside a quoted string.
fn split_directives(value: &str) -> Vec<&str> {
    let mut directives = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                directives.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    directives.push(value[start..].trim());
    directives.retain(|directive| !directive.is_empty());
    directives
}
