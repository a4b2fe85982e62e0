use crate::core::AdmissionWorld;
use anyhow::Error;
use cucumber::when;

#[when(expr = "{word} {string} responds with status {int}")]
fn exchange(world: &mut AdmissionWorld, method: String, path: String, status: u16) -> Result<(), Error> {
    world.decide(&method, &path, status)
}
