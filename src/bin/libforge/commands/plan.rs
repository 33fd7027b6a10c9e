//! `libforge plan` - print the expanded matrix and toolchain plans.
//!
//! A dry run: SDK paths are symbolic placeholders and no external process
//! is spawned.

use anyhow::Result;

use libforge::builder::PlaceholderSdkLocator;
use libforge::ops::plan_matrix;

use crate::cli::BuildArgs;
use crate::commands::{load_recipe, to_request};

pub fn execute(args: BuildArgs) -> Result<()> {
    let recipe = load_recipe(&args)?;
    let request = to_request(&args);

    let plans = plan_matrix(&recipe, &request, &PlaceholderSdkLocator)?;
    println!("{}", serde_json::to_string_pretty(&plans)?);

    Ok(())
}
