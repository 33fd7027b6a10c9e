//! Command implementations.

pub mod build;
pub mod plan;
pub mod recipes;

use anyhow::{bail, Result};
use libforge::recipe::{builtin, Recipe};
use libforge::{BuildRequest, Platform};

use crate::cli::BuildArgs;

/// Load the recipe named by the arguments: a TOML file if given,
/// otherwise the builtin set.
pub fn load_recipe(args: &BuildArgs) -> Result<Recipe> {
    if let Some(path) = &args.recipe {
        return Recipe::from_toml_file(path);
    }

    match builtin::builtin(&args.library) {
        Some(recipe) => Ok(recipe),
        None => bail!(
            "unknown library `{}`; builtin recipes: {}",
            args.library,
            builtin::builtin_names().join(", ")
        ),
    }
}

/// Turn CLI arguments into an immutable build request.
pub fn to_request(args: &BuildArgs) -> BuildRequest {
    let archs = match &args.archs {
        Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        None => default_archs(args.platform),
    };

    BuildRequest {
        platform: args.platform,
        archs,
        config: args.config,
        crt: args.crt,
        intent: args.target,
        out: args.out.clone(),
        branch: args.branch.clone(),
        ndk: args
            .ndk
            .clone()
            .or_else(libforge::builder::toolchain::ndk_from_env),
        shallow: args.shallow,
    }
}

fn default_archs(platform: Platform) -> Vec<String> {
    platform
        .default_arch_tokens()
        .iter()
        .map(|s| s.to_string())
        .collect()
}
