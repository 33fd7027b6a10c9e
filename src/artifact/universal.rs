//! Universal binary composition.
//!
//! Fuses the two slices of the aggregate group into one file per artifact.
//! A single available slice is passed through with a degraded-mode warning
//! instead of failing: a one-architecture package labeled universal is
//! still more useful than no package.

use std::path::Path;

use anyhow::{anyhow, Result};

use crate::artifact::OutputLayout;
use crate::core::errors::ForgeError;
use crate::core::platform::{Arch, Platform};
use crate::core::request::BuildConfig;
use crate::recipe::Recipe;
use crate::util::diagnostic::Report;
use crate::util::fs::{copy_file, ensure_dir, remove_dir_all_if_exists};
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Merge per-architecture slices into universal binaries.
///
/// Runs once, after every cell of the aggregate group has completed. For
/// each artifact: two slices are merged with `lipo`, one is copied through
/// with a warning, zero means the fusion tool is not invoked at all. The
/// per-architecture intermediate directories are removed afterwards.
pub fn compose_universal(
    runner: &dyn CommandRunner,
    lipo: &Path,
    recipe: &Recipe,
    platform: Platform,
    config: BuildConfig,
    layout: &OutputLayout,
    group: [Arch; 2],
    report: &mut Report,
) -> Result<()> {
    let dest_dir = layout.config_dir(config);
    ensure_dir(&dest_dir)?;

    for spec in &recipe.artifacts {
        let file = spec.file_name(platform);

        let slices: Vec<_> = group
            .iter()
            .map(|arch| dest_dir.join(arch.as_str()).join(&file))
            .filter(|p| p.is_file())
            .collect();

        match slices.as_slice() {
            [a, b] => {
                let output = dest_dir.join(&file);
                let cmd = ProcessBuilder::new(lipo)
                    .arg("-create")
                    .arg(a)
                    .arg(b)
                    .arg("-output")
                    .arg(&output);

                let code = runner.stream(&cmd)?;
                if code != 0 {
                    return Err(anyhow!(ForgeError::ExternalCommandFailure {
                        command: cmd.display_command(),
                        code,
                        cell: format!("{} universal ({})", platform, config),
                    }));
                }
                tracing::info!("created universal {}", file);
            }
            [single] => {
                copy_file(single, &dest_dir.join(&file))?;
                report.warn(format!(
                    "only one architecture slice available for {}; packaged single-arch copy",
                    file
                ));
            }
            _ => {}
        }
    }

    for arch in group {
        remove_dir_all_if_exists(&dest_dir.join(arch.as_str()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::CrtLinkage;
    use crate::recipe::builtin;
    use crate::test_support::RecordingRunner;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const GROUP: [Arch; 2] = [Arch::X86_64, Arch::Arm64];

    fn layout(out: &Path) -> OutputLayout {
        OutputLayout::new(out, "draco", Platform::Mac, CrtLinkage::Static)
    }

    fn slice(out: &Path, arch: &str) -> PathBuf {
        let path = out
            .join("draco-mac/lib/Release")
            .join(arch)
            .join("libdraco.a");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, arch).unwrap();
        path
    }

    #[test]
    fn two_slices_are_merged_and_arch_dirs_removed() {
        let tmp = TempDir::new().unwrap();
        slice(tmp.path(), "x86_64");
        slice(tmp.path(), "arm64");

        let runner = RecordingRunner::new();
        let mut report = Report::new();

        compose_universal(
            &runner,
            Path::new("lipo"),
            &builtin::draco(),
            Platform::Mac,
            BuildConfig::Release,
            &layout(tmp.path()),
            GROUP,
            &mut report,
        )
        .unwrap();

        let invocations = runner.invocations();
        assert_eq!(invocations.len(), 1);
        assert!(invocations[0].starts_with("lipo -create"));
        assert!(invocations[0].contains("-output"));

        let release = tmp.path().join("draco-mac/lib/Release");
        assert!(!release.join("x86_64").exists());
        assert!(!release.join("arm64").exists());
        assert!(!report.has_warnings());
    }

    #[test]
    fn single_slice_is_copied_through_with_warning() {
        let tmp = TempDir::new().unwrap();
        slice(tmp.path(), "arm64");

        let runner = RecordingRunner::new();
        let mut report = Report::new();

        compose_universal(
            &runner,
            Path::new("lipo"),
            &builtin::draco(),
            Platform::Mac,
            BuildConfig::Release,
            &layout(tmp.path()),
            GROUP,
            &mut report,
        )
        .unwrap();

        // lipo never invoked; the slice was copied into place instead.
        assert!(runner.invocations().is_empty());
        let merged = tmp.path().join("draco-mac/lib/Release/libdraco.a");
        assert_eq!(fs::read_to_string(merged).unwrap(), "arm64");
        assert!(report.has_warnings());
    }

    #[test]
    fn zero_slices_never_invokes_the_fusion_tool() {
        let tmp = TempDir::new().unwrap();

        let runner = RecordingRunner::new();
        let mut report = Report::new();

        compose_universal(
            &runner,
            Path::new("lipo"),
            &builtin::draco(),
            Platform::Mac,
            BuildConfig::Release,
            &layout(tmp.path()),
            GROUP,
            &mut report,
        )
        .unwrap();

        assert!(runner.invocations().is_empty());
        assert!(!tmp.path().join("draco-mac/lib/Release/libdraco.a").exists());
    }
}
