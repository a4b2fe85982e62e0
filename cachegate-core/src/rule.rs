//! Operator admission rules.
//!
//! A [`Rule`] grants caching independently of protocol freshness. Rules are
//! grouped into a [`RuleSet`] evaluated with OR semantics: the first matching
//! rule wins and evaluation stops there.
//!
//! # Variants
//!
//! | Rule | Matches when |
//! |------|--------------|
//! | [`Rule::Path`] | request path starts with the prefix (literal, no patterns) |
//! | [`Rule::Header`] | first value of the *response* header equals one of the values; an absent header reads as `""` |

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, request::Parts};

/// An operator-configured admission rule.
///
/// # Examples
///
/// ```
/// use cachegate_core::Rule;
/// use http::header::CONTENT_TYPE;
///
/// let static_files = Rule::path("/static");
/// let images = Rule::header(CONTENT_TYPE, ["image/png", "image/jpeg"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Matches requests whose path starts with `prefix`.
    Path {
        /// Literal path prefix.
        prefix: String,
    },
    /// Matches responses whose first `name` header value equals one of `values`.
    Header {
        /// Response header to inspect.
        name: HeaderName,
        /// Accepted values, compared byte for byte.
        values: Vec<String>,
    },
}

impl Rule {
    /// Creates a path prefix rule.
    pub fn path(prefix: impl Into<String>) -> Self {
        Rule::Path {
            prefix: prefix.into(),
        }
    }

    /// Creates a response header rule.
    pub fn header<I, V>(name: HeaderName, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Rule::Header {
            name,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks the rule against an exchange.
    ///
    /// The status code is part of the contract so that future variants can
    /// inspect it; current variants ignore it.
    pub fn matches(&self, request: &Parts, _status: StatusCode, headers: &HeaderMap) -> bool {
        match self {
            Rule::Path { prefix } => request.uri.path().starts_with(prefix.as_str()),
            // An absent header reads as "", so only a configured "" matches it.
            Rule::Header { name, values } => {
                let header_value = headers
                    .get(name)
                    .map_or(b"" as &[u8], HeaderValue::as_bytes);
                values.iter().any(|value| value.as_bytes() == header_value)
            }
        }
    }
}

/// Ordered collection of rules with OR semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet(Vec<Rule>);

impl RuleSet {
    /// Creates an empty rule set. An empty set never matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule, keeping configured order.
    pub fn push(&mut self, rule: Rule) {
        self.0.push(rule);
    }

    /// Returns the first matching rule, if any.
    pub fn first_match(
        &self,
        request: &Parts,
        status: StatusCode,
        headers: &HeaderMap,
    ) -> Option<&Rule> {
        self.0
            .iter()
            .find(|rule| rule.matches(request, status, headers))
    }

    /// Returns `true` if any rule matches.
    pub fn matches(&self, request: &Parts, status: StatusCode, headers: &HeaderMap) -> bool {
        self.first_match(request, status, headers).is_some()
    }

    /// Iterates rules in configured order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        RuleSet(iter.into_iter().collect())
    }
}

impl Extend<Rule> for RuleSet {
    fn extend<T: IntoIterator<Item = Rule>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
