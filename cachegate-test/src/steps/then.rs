use crate::core::AdmissionWorld;
use anyhow::{Error, anyhow};
use cachegate::{Decision, Rejection};
use chrono::TimeDelta;
use cucumber::then;

fn rejection_name(rejection: &Rejection) -> &'static str {
    match rejection {
        Rejection::NotAdmissible => "NotAdmissible",
        Rejection::Forbidden(_) => "Forbidden",
        Rejection::VaryWildcard => "VaryWildcard",
        Rejection::NoFreshness => "NoFreshness",
    }
}

#[then(expr = "the exchange is cacheable")]
fn cacheable(world: &mut AdmissionWorld) -> Result<(), Error> {
    match world.decision()? {
        Decision::Cacheable { .. } => Ok(()),
        Decision::NonCacheable(rejection) => Err(anyhow!("expected cacheable, got: {rejection}")),
    }
}

#[then(expr = "the exchange expires in {int} seconds")]
fn expires_in(world: &mut AdmissionWorld, seconds: i64) -> Result<(), Error> {
    let now = world
        .now
        .ok_or_else(|| anyhow!("exact expiration needs a pinned clock"))?;
    let expected = now + TimeDelta::seconds(seconds);
    match world.decision()?.expires_at() {
        Some(expires_at) if expires_at == expected => Ok(()),
        Some(expires_at) => Err(anyhow!("expires at {expires_at}, expected {expected}")),
        None => Err(anyhow!("exchange is not cacheable")),
    }
}

#[then(expr = "the exchange is not cacheable because {string}")]
fn not_cacheable(world: &mut AdmissionWorld, reason: String) -> Result<(), Error> {
    match world.decision()? {
        Decision::NonCacheable(rejection) if rejection_name(rejection) == reason => Ok(()),
        Decision::NonCacheable(rejection) => {
            Err(anyhow!("rejected for '{}', expected '{reason}'", rejection_name(rejection)))
        }
        Decision::Cacheable { expires_at } => {
            Err(anyhow!("expected rejection, cacheable until {expires_at}"))
        }
    }
}

#[then(expr = "the decision fails")]
fn fails(world: &mut AdmissionWorld) -> Result<(), Error> {
    match &world.result {
        Some(Err(_)) => Ok(()),
        Some(Ok(decision)) => Err(anyhow!("expected failure, got {decision:?}")),
        None => Err(anyhow!("no decision was made")),
    }
}

#[then(expr = "the directive oracle was consulted {int} time(s)")]
fn oracle_calls(world: &mut AdmissionWorld, calls: usize) -> Result<(), Error> {
    if world.oracle_calls == calls {
        Ok(())
    } else {
        Err(anyhow!(
            "oracle consulted {} time(s), expected {calls}",
            world.oracle_calls
        ))
    }
}
