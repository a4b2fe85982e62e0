use std::cell::Cell;
use std::time::Duration;

use anyhow::{Error, anyhow};
use cachegate::{
    Decision, DirectiveOracle, OracleError, Policy, Rfc7234Oracle, Verdict, decide, decide_at,
};
use cachegate_configuration::ConfigPolicy;
use chrono::{DateTime, Utc};
use cucumber::World;
use cucumber::gherkin::Step;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode, request::Parts};

/// Inputs of one exchange, filled by `Given` steps.
#[derive(Debug, Default)]
pub struct Exchange {
    pub request_headers: HeaderMap,
    pub response_headers: HeaderMap,
}

#[derive(Debug, World)]
pub struct AdmissionWorld {
    /// Pinned clock; `None` decides against the wall clock.
    pub now: Option<DateTime<Utc>>,
    pub policy: Policy,
    pub exchange: Exchange,
    pub result: Option<Result<Decision, OracleError>>,
    pub oracle_calls: usize,
}

impl Default for AdmissionWorld {
    fn default() -> Self {
        Self {
            now: None,
            policy: Policy::builder()
                .default_max_age(Duration::from_secs(60))
                .build(),
            exchange: Exchange::default(),
            result: None,
            oracle_calls: 0,
        }
    }
}

impl AdmissionWorld {
    pub fn set_policy(&mut self, yaml: &str) -> Result<(), Error> {
        self.policy = ConfigPolicy::from_yaml(yaml)?.into_policy()?;
        Ok(())
    }

    /// Runs the decision with the RFC 7234 oracle, counting oracle invocations.
    ///
    /// Uses the world clock when one was set, the wall clock otherwise.
    pub fn decide(&mut self, method: &str, path: &str, status: u16) -> Result<(), Error> {
        let request = self.request(method, path)?;
        let status = StatusCode::from_u16(status)?;

        let calls = Cell::new(0);
        let oracle = Rfc7234Oracle::new();
        let counting = |now: DateTime<Utc>,
                        request: &Parts,
                        status: StatusCode,
                        headers: &HeaderMap,
                        shared_cache: bool|
         -> Result<Verdict, OracleError> {
            calls.set(calls.get() + 1);
            oracle.evaluate(now, request, status, headers, shared_cache)
        };

        let headers = &self.exchange.response_headers;
        let result = match self.now {
            Some(now) => decide_at(now, &request, status, headers, &self.policy, &counting),
            None => decide(&request, status, headers, &self.policy, &counting),
        };
        self.oracle_calls = calls.get();
        self.result = Some(result);
        Ok(())
    }

    pub fn decision(&self) -> Result<&Decision, Error> {
        match &self.result {
            Some(Ok(decision)) => Ok(decision),
            Some(Err(error)) => Err(anyhow!("decision failed: {error}")),
            None => Err(anyhow!("no decision was made")),
        }
    }

    fn request(&self, method: &str, path: &str) -> Result<Parts, Error> {
        let mut request = Request::builder()
            .method(Method::from_bytes(method.as_bytes())?)
            .uri(path)
            .body(())?;
        *request.headers_mut() = self.exchange.request_headers.clone();
        Ok(request.into_parts().0)
    }
}

pub fn header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), Error> {
    Ok((HeaderName::from_bytes(name.as_bytes())?, HeaderValue::from_str(value)?))
}

pub trait StepExt {
    fn docstring_content(&self) -> Option<String>;
}

impl StepExt for Step {
    fn docstring_content(&self) -> Option<String> {
        self.docstring()
            .map(|docstring| docstring.lines().skip(1).collect::<Vec<_>>().join("\n"))
    }
}
