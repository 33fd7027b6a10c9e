//! Header packaging into the unified include tree.
//!
//! Copies the declared public header directories only, never the whole
//! source tree. Build-generated feature headers live in the build output
//! and get their own lookup with a recursive fallback.

use std::path::Path;

use anyhow::Result;
use walkdir::WalkDir;

use crate::core::errors::ForgeError;
use crate::recipe::{GeneratedHeader, Recipe};
use crate::util::diagnostic::Report;
use crate::util::fs::{copy_file, ensure_dir, headers_in};

/// Copy a recipe's public headers from the source checkout into
/// `<include_root>/...`, preserving the declared directory structure.
pub fn package_headers(recipe: &Recipe, source_dir: &Path, include_root: &Path) -> Result<()> {
    for header_dir in &recipe.headers {
        let src = source_dir.join(&header_dir.source);
        if !src.is_dir() {
            tracing::debug!("header dir {} absent, skipping", src.display());
            continue;
        }

        let dest_dir = if header_dir.dest.is_empty() {
            include_root.to_path_buf()
        } else {
            include_root.join(&header_dir.dest)
        };
        ensure_dir(&dest_dir)?;

        for header in headers_in(&src)? {
            let Some(name) = header.file_name() else {
                continue;
            };
            copy_file(&header, &dest_dir.join(name))?;
        }
    }

    Ok(())
}

/// Copy the build-generated feature header from a cell's build output.
///
/// The canonical location is tried first, then a recursive search.
/// Absence is a warning, not fatal — but a loud one, because downstream
/// compilation cannot succeed without this header.
pub fn package_generated_header(
    gh: &GeneratedHeader,
    build_dir: &Path,
    include_root: &Path,
    report: &mut Report,
) -> Result<()> {
    let canonical = build_dir.join(&gh.canonical);

    let found = if canonical.is_file() {
        Some(canonical)
    } else {
        WalkDir::new(build_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .find(|e| {
                e.file_type().is_file() && e.file_name().to_string_lossy() == gh.file_name
            })
            .map(|e| e.into_path())
    };

    match found {
        Some(src) => {
            copy_file(&src, &include_root.join(&gh.dest))?;
            tracing::info!("packaged generated header {}", gh.dest);
        }
        None => {
            let err = ForgeError::GeneratedHeaderMissing {
                file_name: gh.file_name.clone(),
                searched: build_dir.display().to_string(),
            };
            report.push(err.to_diagnostic());
        }
    }

    Ok(())
}
