//! Artifact resolution inside a cell's build output.
//!
//! Build tools scatter their outputs: some drop the library at the build
//! root, some under the target's source subdirectory, multi-config
//! generators add a Release/Debug level. The ranked candidate list encodes
//! that knowledge per recipe; the recursive walk is a last resort with a
//! disambiguation rule so a sibling artifact is never picked by accident.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::platform::Platform;
use crate::core::request::BuildConfig;
use crate::recipe::ArtifactSpec;

/// Outcome of resolving one artifact in one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved { path: PathBuf },
    Unresolved { reason: String },
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

/// Resolve an artifact within a cell's build directory.
///
/// Candidate paths are tried in declared order; the first existing file
/// wins. Only if none exists does the fuzzy recursive search run.
pub fn resolve_artifact(
    spec: &ArtifactSpec,
    platform: Platform,
    config: BuildConfig,
    build_dir: &Path,
) -> Resolution {
    let mut names = vec![spec.file_name(platform)];
    names.extend(spec.alt_names.iter().cloned());

    for dir_template in &spec.candidate_dirs {
        let dir = dir_template.replace("{config}", config.as_str());
        for name in &names {
            let candidate = if dir.is_empty() {
                build_dir.join(name)
            } else {
                build_dir.join(&dir).join(name)
            };
            if candidate.is_file() {
                return Resolution::Resolved { path: candidate };
            }
        }
    }

    if let Some(path) = fuzzy_search(spec, platform, build_dir) {
        return Resolution::Resolved { path };
    }

    Resolution::Unresolved {
        reason: format!(
            "no candidate path matched and recursive search of {} found nothing",
            build_dir.display()
        ),
    }
}

fn fuzzy_search(spec: &ArtifactSpec, platform: Platform, build_dir: &Path) -> Option<PathBuf> {
    let fragment = spec.fuzzy_fragment();
    let extension = platform.lib_extension();

    for entry in WalkDir::new(build_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !name.contains(fragment) {
            continue;
        }
        if spec.exclude.iter().any(|ex| name.contains(ex.as_str())) {
            continue;
        }

        return Some(path.to_path_buf());
    }

    None
}
