use std::process::ExitCode;

use log::debug;

use faker::pipeline::Pipeline;
use faker::registry::Registry;

/// Resolve `args` to an alias and run it, exiting with the last stage's code.
///
/// # Errors
///
/// Returns an error if no single alias matches, or the pipeline cannot be built or
/// started. A non-zero exit of the aliased program is not an error.
pub fn run(registry: &Registry, args: &[String]) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let resolution = registry.find(args)?;
    debug!("Running alias `{}`", resolution.key);
    let pipeline = Pipeline::build(resolution.command, resolution.rest)?;
    let code = pipeline.run()?;
    Ok(u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from))
}
