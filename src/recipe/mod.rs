//! Library recipes: everything that varies per third-party library.
//!
//! A recipe is pure data — source location, CMake feature defines,
//! artifact specs, header layout. New libraries are added as data (a
//! builtin constructor or a TOML file), never as new branching code.

pub mod builtin;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::platform::Platform;

/// A logical artifact and the knowledge needed to find it in a cell's
/// build output.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSpec {
    /// Logical name, e.g. "webp" for libwebp.a / webp.lib.
    pub name: String,

    /// Whether the run fails if this artifact stays unresolved.
    #[serde(default)]
    pub required: bool,

    /// Ordered candidate directories relative to the cell build dir.
    /// `{config}` is replaced with the configuration name; toolchains like
    /// MSVC drop artifacts into a configuration-named subdirectory.
    #[serde(default)]
    pub candidate_dirs: Vec<String>,

    /// Alternate file names the build may have produced (e.g. libuv emits
    /// `libuv_a.a` for its static library).
    #[serde(default)]
    pub alt_names: Vec<String>,

    /// Name fragments that disqualify a fuzzy match, so a sibling artifact
    /// (e.g. an encoder library next to the decoder) is never picked up.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Explicit output file name on Windows, when it differs from the
    /// derived `<name>.lib`.
    #[serde(default)]
    pub win_name: Option<String>,
}

impl ArtifactSpec {
    /// Canonical packaged file name for a platform.
    pub fn file_name(&self, platform: Platform) -> String {
        match platform {
            Platform::Win => self
                .win_name
                .clone()
                .unwrap_or_else(|| format!("{}.lib", self.name)),
            _ => format!("lib{}.a", self.name),
        }
    }

    /// Fragment used by the fuzzy fallback search.
    pub fn fuzzy_fragment(&self) -> &str {
        &self.name
    }
}

/// One public header directory to package.
#[derive(Debug, Clone, Deserialize)]
pub struct HeaderDir {
    /// Directory relative to the source checkout.
    pub source: String,
    /// Destination relative to `<out>/include/`. Empty means the include
    /// root itself.
    #[serde(default)]
    pub dest: String,
}

/// A build-generated header that must be packaged from the build output,
/// not the source tree.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedHeader {
    /// Canonical location relative to the cell build dir, tried first.
    pub canonical: String,
    /// File name used by the recursive fallback search.
    pub file_name: String,
    /// Destination path relative to `<out>/include/`.
    pub dest: String,
}

/// A third-party library build recipe.
#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    /// Short name; also the output directory prefix (`<name>-<platform>`).
    pub name: String,

    /// Git remote holding the library source.
    pub git_url: String,

    /// Branch or tag built when `--branch` is not given.
    pub default_branch: String,

    /// Library feature defines passed to every configure invocation.
    #[serde(default)]
    pub cmake_defines: Vec<String>,

    /// Artifacts to resolve and package, declared once, shared by all cells.
    pub artifacts: Vec<ArtifactSpec>,

    /// Public header directories to package.
    #[serde(default)]
    pub headers: Vec<HeaderDir>,

    /// Feature header generated by the configure step, if any.
    #[serde(default)]
    pub generated_header: Option<GeneratedHeader>,
}

impl Recipe {
    /// Load a recipe from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Recipe> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe file: {}", path.display()))?;
        let recipe: Recipe = toml::from_str(&text)
            .with_context(|| format!("failed to parse recipe file: {}", path.display()))?;
        Ok(recipe)
    }

    /// The recipe's required artifact specs.
    pub fn required_artifacts(&self) -> impl Iterator<Item = &ArtifactSpec> {
        self.artifacts.iter().filter(|a| a.required)
    }
}
