//! `libforge build` - run the full build matrix.

use anyhow::Result;

use libforge::builder::XcrunSdkLocator;
use libforge::ops::run_build;
use libforge::sources::GitSourceProvider;
use libforge::util::SystemRunner;

use crate::cli::BuildArgs;
use crate::commands::{load_recipe, to_request};

pub fn execute(args: BuildArgs, color: bool) -> Result<()> {
    let recipe = load_recipe(&args)?;
    let request = to_request(&args);

    let runner = SystemRunner;
    let sdk = XcrunSdkLocator::new(&runner);

    run_build(&recipe, &request, &runner, &sdk, &GitSourceProvider, color)?;

    tracing::info!(
        "build completed for {} {} ({})",
        recipe.name,
        request.platform,
        request.config
    );
    Ok(())
}
