//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Copy a single file, creating the destination's parent directories.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(src, dst).with_context(|| {
        format!("failed to copy {} to {}", src.display(), dst.display())
    })?;
    Ok(())
}

/// List the `.h` files directly inside a directory (non-recursive).
///
/// Header packaging copies declared directories only, never a full source
/// tree, so one level of globbing is all that is ever needed.
pub fn headers_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("*.h");
    let pattern = pattern.to_string_lossy();

    let mut headers = Vec::new();
    for entry in glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
    {
        let path = entry?;
        if path.is_file() {
            headers.push(path);
        }
    }
    headers.sort();
    Ok(headers)
}
