use crate::core::{AdmissionWorld, StepExt, header};
use anyhow::{Error, anyhow};
use chrono::{DateTime, Utc};
use cucumber::gherkin::Step;
use cucumber::given;

#[given(expr = "the clock is at {string}")]
fn clock(world: &mut AdmissionWorld, instant: String) -> Result<(), Error> {
    world.now = Some(DateTime::parse_from_rfc3339(&instant)?.with_timezone(&Utc));
    Ok(())
}

#[given(expr = "policy")]
fn policy(world: &mut AdmissionWorld, step: &Step) -> Result<(), Error> {
    let yaml = step
        .docstring_content()
        .ok_or_else(|| anyhow!("policy not provided"))?;
    world.set_policy(&yaml)
}

#[given(expr = "request header {string} is {string}")]
fn request_header(world: &mut AdmissionWorld, name: String, value: String) -> Result<(), Error> {
    let (name, value) = header(&name, &value)?;
    world.exchange.request_headers.append(name, value);
    Ok(())
}

#[given(expr = "response header {string} is {string}")]
fn response_header(world: &mut AdmissionWorld, name: String, value: String) -> Result<(), Error> {
    let (name, value) = header(&name, &value)?;
    world.exchange.response_headers.append(name, value);
    Ok(())
}
