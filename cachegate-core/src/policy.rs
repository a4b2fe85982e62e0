//! Operator policy: default lifetime plus admission rules.
//!
//! A [`Policy`] is built once (usually from configuration) and read by every
//! decision afterwards. It holds no interior mutability, so it can be shared
//! between threads behind an `Arc` or a plain reference.

use std::time::Duration;

use crate::rule::{Rule, RuleSet};

/// Lifetime used when neither the protocol nor the operator provides one.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Immutable operator policy.
///
/// # Example
///
/// ```
/// use cachegate_core::{Policy, Rule};
/// use std::time::Duration;
///
/// let policy = Policy::builder()
///     .default_max_age(Duration::from_secs(60))
///     .rule(Rule::path("/static"))
///     .build();
///
/// assert_eq!(policy.default_max_age(), Duration::from_secs(60));
/// assert_eq!(policy.rules().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    default_max_age: Duration,
    rules: RuleSet,
}

impl Policy {
    /// Creates a policy from its parts.
    pub fn new(default_max_age: Duration, rules: RuleSet) -> Self {
        Self {
            default_max_age,
            rules,
        }
    }

    /// Creates a new [`PolicyBuilder`].
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::new()
    }

    /// Lifetime applied when caching is justified but no explicit freshness exists.
    pub fn default_max_age(&self) -> Duration {
        self.default_max_age
    }

    /// Admission rules in configured order.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE, RuleSet::new())
    }
}

/// Builder for [`Policy`].
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    default_max_age: Option<Duration>,
    rules: RuleSet,
}

impl PolicyBuilder {
    /// Creates a builder with no rules and [`DEFAULT_MAX_AGE`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default max-age.
    pub fn default_max_age(self, default_max_age: Duration) -> Self {
        Self {
            default_max_age: Some(default_max_age),
            ..self
        }
    }

    /// Appends a rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends several rules.
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Builds the [`Policy`].
    pub fn build(self) -> Policy {
        Policy {
            default_max_age: self.default_max_age.unwrap_or(DEFAULT_MAX_AGE),
            rules: self.rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_defaults() {
        let policy = Policy::builder().build();
        assert_eq!(policy, Policy::default());
        assert_eq!(policy.default_max_age(), DEFAULT_MAX_AGE);
        assert!(policy.rules().is_empty());
    }

    #[test]
    fn test_builder_keeps_rule_order() {
        let policy = Policy::builder()
            .rule(Rule::path("/b"))
            .rules([Rule::path("/a"), Rule::path("/c")])
            .build();
        let prefixes: Vec<_> = policy
            .rules()
            .iter()
            .map(|rule| match rule {
                Rule::Path { prefix } => prefix.as_str(),
                Rule::Header { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(prefixes, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_policy_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Policy>();
    }
}
