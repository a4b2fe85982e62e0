use std::time::Duration;

use cachegate_configuration::{ConfigError, ConfigPolicy, HeaderValues, PathOperation, RuleConfig};
use cachegate_core::{DEFAULT_MAX_AGE, Policy, Rule};
use http::header::CONTENT_TYPE;
use http::HeaderName;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

#[test]
fn test_full_policy_deserialize() {
    let yaml = r#"
default_max_age: 90s
rules:
  - Path: /static
  - Path:
      in: ["/api/v1", "/api/v2"]
  - Header:
      Content-Type: ["image/png", "image/jpeg"]
      X-Cache-Me: "yes"
"#;

    let config: ConfigPolicy = serde_saphyr::from_str(yaml).expect("failed to deserialize");
    assert_eq!(config.default_max_age, Duration::from_secs(90));
    assert_eq!(
        config.rules[0],
        RuleConfig::Path(PathOperation::Prefix("/static".to_string()))
    );
    assert_eq!(
        config.rules[1],
        RuleConfig::Path(PathOperation::In {
            r#in: vec!["/api/v1".to_string(), "/api/v2".to_string()]
        })
    );

    let policy = config.into_policy().expect("valid policy");
    let rules: Vec<Rule> = policy.rules().iter().cloned().collect();
    assert_eq!(
        rules,
        vec![
            Rule::path("/static"),
            Rule::path("/api/v1"),
            Rule::path("/api/v2"),
            Rule::header(CONTENT_TYPE, ["image/png", "image/jpeg"]),
            Rule::header(HeaderName::from_static("x-cache-me"), ["yes"]),
        ]
    );
}

#[test]
fn test_empty_document_uses_defaults() {
    let policy = ConfigPolicy::from_yaml("{}").unwrap().into_policy().unwrap();
    assert_eq!(policy.default_max_age(), DEFAULT_MAX_AGE);
    assert!(policy.rules().is_empty());
    assert_eq!(policy, Policy::default());
}

#[test]
fn test_humantime_durations() {
    let config = ConfigPolicy::from_yaml("default_max_age: 1h 30m").unwrap();
    assert_eq!(config.default_max_age, Duration::from_secs(5400));
}

#[test]
fn test_header_single_and_list_values() {
    let yaml = r#"
rules:
  - Header:
      X-A: "one"
      X-B: ["two", "three"]
"#;
    let config = ConfigPolicy::from_yaml(yaml).unwrap();
    let mut expected = IndexMap::new();
    expected.insert("X-A".to_string(), HeaderValues::One("one".to_string()));
    expected.insert(
        "X-B".to_string(),
        HeaderValues::Many(vec!["two".to_string(), "three".to_string()]),
    );
    assert_eq!(config.rules, vec![RuleConfig::Header(expected)]);
}

#[test]
fn test_empty_path_list_is_rejected() {
    let yaml = r#"
rules:
  - Path:
      in: []
"#;
    let result = ConfigPolicy::from_yaml(yaml).unwrap().into_policy();
    assert!(matches!(result, Err(ConfigError::EmptyPathList)));
}

#[test]
fn test_empty_header_values_are_rejected() {
    let yaml = r#"
rules:
  - Header:
      X-Cache-Me: []
"#;
    let result = Policy::try_from(ConfigPolicy::from_yaml(yaml).unwrap());
    assert!(matches!(result, Err(ConfigError::EmptyHeaderValues(name)) if name == "X-Cache-Me"));
}

#[test]
fn test_invalid_header_name_is_rejected() {
    let yaml = r#"
rules:
  - Header:
      "bad header": "x"
"#;
    let result = ConfigPolicy::from_yaml(yaml).unwrap().into_policy();
    assert!(matches!(result, Err(ConfigError::InvalidHeaderName(..))));
}

#[test]
fn test_unknown_rule_kind_fails_to_parse() {
    let yaml = r#"
rules:
  - Query: "page"
"#;
    assert!(matches!(
        ConfigPolicy::from_yaml(yaml),
        Err(ConfigError::Yaml(_))
    ));
}
